use candid::CandidType;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for contract invocations and scans.
///

#[derive(CandidType, Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub operations: BTreeMap<String, OperationCounters>,
    pub scans: BTreeMap<String, ScanCounters>,
    pub since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            operations: BTreeMap::new(),
            scans: BTreeMap::new(),
            since_ms: now_millis(),
        }
    }
}

///
/// EventOps
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Invocations
    pub invocations: u64,
    pub failures: u64,

    // Entity writes
    pub creates: u64,
    pub transfers: u64,
    pub deletes: u64,

    // Index maintenance
    pub index_inserts: u64,
    pub index_removes: u64,
}

///
/// OperationCounters
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct OperationCounters {
    pub calls: u64,
    pub successes: u64,
    pub failures: u64,
}

///
/// ScanCounters
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct ScanCounters {
    pub scans: u64,
    pub rows_returned: u64,
    pub rows_skipped: u64,
    pub decode_fallbacks: u64,
    pub closed: u64,
    pub close_failures: u64,
}

///
/// EventReport
/// Metrics snapshot; `counters` is `None` when the window filter excludes it.
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: Option<EventState>,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters and restart the window.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

pub(crate) fn report_window_start(window_start_ms: Option<u64>) -> EventReport {
    with_state(|m| match window_start_ms {
        Some(start) if start > m.since_ms => EventReport::default(),
        _ => EventReport {
            counters: Some(m.clone()),
        },
    })
}

#[expect(clippy::cast_sign_loss)]
fn now_millis() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_window_start_before_window_returns_counters() {
        reset_all();
        let since = with_state(|m| m.since_ms);

        let report = report_window_start(Some(since.saturating_sub(1)));
        assert!(report.counters.is_some());
    }

    #[test]
    fn report_window_start_after_window_returns_empty() {
        reset_all();
        let since = with_state(|m| m.since_ms);

        let report = report_window_start(Some(since.saturating_add(1)));
        assert!(report.counters.is_none());
    }
}
