//! Result aggregation.
//!
//! Drains a scoped ledger iterator into an ordered collection of records.
//! Empty values are skipped, values that are not JSON degrade to their raw
//! string form, and the iterator is closed on every exit path.


use crate::{
    error::InternalError,
    ledger::{KeyModification, KeyValue, LedgerIterator, ScopedIterator, Timestamp},
    obs::{MetricsEvent, ScanKind, record},
};
use derive_more::{Deref, IntoIterator};
use serde::Serialize;
use serde_json::Value as JsonValue;

///
/// ResultMode
/// Which record shape an aggregation produces.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResultMode {
    Standard,
    History,
}

///
/// StandardRecord
/// One range or rich query row.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StandardRecord {
    pub key: String,
    pub record: JsonValue,
}

///
/// HistoryRecord
/// One historical version of a key.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HistoryRecord {
    pub tx_id: String,
    pub timestamp: Timestamp,
    pub is_delete: String,
    pub value: JsonValue,
}

///
/// QueryRecord
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryRecord {
    Standard(StandardRecord),
    History(HistoryRecord),
}

impl QueryRecord {
    #[must_use]
    pub const fn mode(&self) -> ResultMode {
        match self {
            Self::Standard(_) => ResultMode::Standard,
            Self::History(_) => ResultMode::History,
        }
    }
}

///
/// Records
/// Aggregated rows in iteration order; serializes as a JSON array.
///

#[derive(Clone, Debug, Default, Deref, IntoIterator, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Records(Vec<QueryRecord>);

impl Records {
    pub fn to_json(&self) -> Result<Vec<u8>, InternalError> {
        serde_json::to_vec(self)
            .map_err(|err| InternalError::aggregate_internal(format!("failed to encode results: {err}")))
    }
}

///
/// Aggregate
///
/// Ledger entry that can be aggregated. The mode is fixed by the entry
/// type, so the iterator factory that produced a scan also selects the
/// record shape.
///

pub trait Aggregate: Sized {
    const MODE: ResultMode;

    fn value(&self) -> &[u8];

    fn into_record(self, value: JsonValue) -> QueryRecord;
}

impl Aggregate for KeyValue {
    const MODE: ResultMode = ResultMode::Standard;

    fn value(&self) -> &[u8] {
        &self.value
    }

    fn into_record(self, value: JsonValue) -> QueryRecord {
        QueryRecord::Standard(StandardRecord {
            key: self.key,
            record: value,
        })
    }
}

impl Aggregate for KeyModification {
    const MODE: ResultMode = ResultMode::History;

    fn value(&self) -> &[u8] {
        &self.value
    }

    fn into_record(self, value: JsonValue) -> QueryRecord {
        QueryRecord::History(HistoryRecord {
            tx_id: self.tx_id,
            timestamp: self.timestamp,
            is_delete: self.is_delete.to_string(),
            value,
        })
    }
}

/// Drain `scope` in `mode`.
///
/// Fails if `mode` does not match the entries the scope yields, if the
/// ledger reports an error mid-iteration, or if closing fails.
pub fn aggregate<I, T>(
    mut scope: ScopedIterator<I, T>,
    mode: ResultMode,
) -> Result<Records, InternalError>
where
    I: LedgerIterator<T>,
    T: Aggregate,
{
    let scan = scope.scan_kind();
    if T::MODE != mode {
        return Err(InternalError::aggregate_internal(format!(
            "{} scan cannot produce {mode:?} records",
            scan.as_str()
        )));
    }

    let mut rows = Vec::new();
    let mut skipped = 0u64;

    for entry in scope.by_ref() {
        let entry = entry?;
        if entry.value().is_empty() {
            skipped += 1;
            continue;
        }

        let value = decode_value(scan, entry.value());
        rows.push(entry.into_record(value));
    }
    scope.finish()?;

    record(MetricsEvent::RowsScanned {
        scan,
        returned: rows.len() as u64,
        skipped,
    });

    Ok(Records(rows))
}

/// Decode a stored value, falling back to its lossy UTF-8 text.
pub fn decode_value(scan: ScanKind, bytes: &[u8]) -> JsonValue {
    serde_json::from_slice(bytes).unwrap_or_else(|_| {
        record(MetricsEvent::DecodeFallback { scan });

        JsonValue::String(String::from_utf8_lossy(bytes).into_owned())
    })
}
