//! Event routing.
//!
//! Handlers, scans and entity writes report what happened as
//! [`MetricsEvent`]s. Whether an event lands in the thread-local counters
//! or in a test-installed sink is decided here and nowhere else.

use crate::obs::metrics;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// WriteKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteKind {
    Create,
    Transfer,
    Delete,
}

///
/// ScanKind
/// Which ledger iterator factory produced a scan.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScanKind {
    Range,
    PartialKey,
    Rich,
    History,
    PagedRange,
    PagedRich,
}

impl ScanKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Range => "range",
            Self::PartialKey => "partial_key",
            Self::Rich => "rich",
            Self::History => "history",
            Self::PagedRange => "paged_range",
            Self::PagedRich => "paged_rich",
        }
    }
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    InvocationStart {
        operation: &'static str,
    },
    InvocationFinish {
        operation: &'static str,
        ok: bool,
    },
    EntityWrite {
        kind: WriteKind,
    },
    IndexDelta {
        inserts: u64,
        removes: u64,
    },
    RowsScanned {
        scan: ScanKind,
        returned: u64,
        skipped: u64,
    },
    DecodeFallback {
        scan: ScanKind,
    },
    IteratorClosed {
        scan: ScanKind,
        clean: bool,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

///
/// GlobalMetricsSink
/// Folds events into the thread-local counters.
///

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::InvocationStart { operation } => {
                metrics::with_state_mut(|m| {
                    m.ops.invocations = m.ops.invocations.saturating_add(1);
                    let entry = m.operations.entry(operation.to_string()).or_default();
                    entry.calls = entry.calls.saturating_add(1);
                });
            }

            MetricsEvent::InvocationFinish { operation, ok } => {
                metrics::with_state_mut(|m| {
                    let entry = m.operations.entry(operation.to_string()).or_default();
                    if ok {
                        entry.successes = entry.successes.saturating_add(1);
                    } else {
                        m.ops.failures = m.ops.failures.saturating_add(1);
                        entry.failures = entry.failures.saturating_add(1);
                    }
                });
            }

            MetricsEvent::EntityWrite { kind } => {
                metrics::with_state_mut(|m| match kind {
                    WriteKind::Create => m.ops.creates = m.ops.creates.saturating_add(1),
                    WriteKind::Transfer => m.ops.transfers = m.ops.transfers.saturating_add(1),
                    WriteKind::Delete => m.ops.deletes = m.ops.deletes.saturating_add(1),
                });
            }

            MetricsEvent::IndexDelta { inserts, removes } => {
                metrics::with_state_mut(|m| {
                    m.ops.index_inserts = m.ops.index_inserts.saturating_add(inserts);
                    m.ops.index_removes = m.ops.index_removes.saturating_add(removes);
                });
            }

            MetricsEvent::RowsScanned {
                scan,
                returned,
                skipped,
            } => {
                metrics::with_state_mut(|m| {
                    let entry = m.scans.entry(scan.as_str().to_string()).or_default();
                    entry.scans = entry.scans.saturating_add(1);
                    entry.rows_returned = entry.rows_returned.saturating_add(returned);
                    entry.rows_skipped = entry.rows_skipped.saturating_add(skipped);
                });
            }

            MetricsEvent::DecodeFallback { scan } => {
                metrics::with_state_mut(|m| {
                    let entry = m.scans.entry(scan.as_str().to_string()).or_default();
                    entry.decode_fallbacks = entry.decode_fallbacks.saturating_add(1);
                });
            }

            MetricsEvent::IteratorClosed { scan, clean } => {
                metrics::with_state_mut(|m| {
                    let entry = m.scans.entry(scan.as_str().to_string()).or_default();
                    if clean {
                        entry.closed = entry.closed.saturating_add(1);
                    } else {
                        entry.close_failures = entry.close_failures.saturating_add(1);
                    }
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

/// Route one event to the scoped override, or to global metrics state.
pub fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Counters accumulated on this thread. Empty when `window_start_ms` is
/// later than the start of the current window.
#[must_use]
pub fn metrics_report(window_start_ms: Option<u64>) -> metrics::EventReport {
    metrics::report_window_start(window_start_ms)
}

/// Zero every counter and open a new window.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// The previous override is restored on every exit, including unwinding.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// Span
/// Start/finish bracket for one invocation. Dropped without `succeed`,
/// it reports the invocation as failed.
///

pub struct Span {
    operation: &'static str,
    ok: bool,
}

impl Span {
    #[must_use]
    pub fn new(operation: &'static str) -> Self {
        record(MetricsEvent::InvocationStart { operation });

        Self {
            operation,
            ok: false,
        }
    }

    pub const fn succeed(&mut self) {
        self.ok = true;
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        record(MetricsEvent::InvocationFinish {
            operation: self.operation,
            ok: self.ok,
        });
    }
}
