//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Contract logic never touches metrics state directly; it emits
//! [`MetricsEvent`]s and the active sink decides what to do with them.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, EventState, OperationCounters, ScanCounters};
pub use sink::{
    MetricsEvent, MetricsSink, ScanKind, Span, WriteKind, metrics_report, metrics_reset_all,
    record, with_metrics_sink,
};
