//! Ledger collaborator boundary.
//!
//! The contract never owns storage. Every read, write, scan and history
//! lookup goes through [`Ledger`], which the host implements on top of its
//! world state for the lifetime of one transaction.

pub mod composite;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
mod scope;

use crate::error::InternalError;
use candid::CandidType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

// re-exports
pub use composite::CompositeKeyError;
pub use scope::ScopedIterator;

///
/// LedgerError
/// Failure reported by the ledger collaborator.
///

#[derive(Debug, ThisError)]
pub enum LedgerError {
    #[error("ledger call failed: {0}")]
    Call(String),

    #[error(transparent)]
    CompositeKey(#[from] CompositeKeyError),

    #[error("unsupported query: {0}")]
    UnsupportedQuery(String),

    #[error("no open transaction for write to key '{key}'")]
    NoTransaction { key: String },
}

impl From<LedgerError> for InternalError {
    fn from(err: LedgerError) -> Self {
        Self::ledger_internal(err.to_string())
    }
}

///
/// KeyValue
/// One world-state entry yielded by a state iterator.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

///
/// Timestamp
/// Transaction timestamp as reported by the ledger (seconds + nanos).
///

#[derive(
    CandidType, Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    #[must_use]
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    #[must_use]
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Convert to a UTC datetime; `None` if the value is out of range.
    #[must_use]
    #[expect(clippy::cast_sign_loss)]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        if self.nanos < 0 {
            return None;
        }

        DateTime::from_timestamp(self.seconds, self.nanos as u32)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    #[expect(clippy::cast_possible_wrap)]
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos() as i32,
        }
    }
}

///
/// KeyModification
/// One historical version of a key, as yielded by a history iterator.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyModification {
    pub tx_id: String,
    pub timestamp: Timestamp,
    pub is_delete: bool,
    pub value: Vec<u8>,
}

///
/// QueryResponseMetadata
/// Page accounting returned by the paginated scan factories.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryResponseMetadata {
    pub fetched_records_count: u32,
    pub bookmark: String,
}

///
/// LedgerIterator
///
/// Lazy result iterator handed out by the ledger. Holds a host-side
/// resource until `close` is called; callers go through [`ScopedIterator`]
/// so that release happens on every exit path.
///

pub trait LedgerIterator<T>: Iterator<Item = Result<T, LedgerError>> {
    fn close(&mut self) -> Result<(), LedgerError>;
}

///
/// Ledger
///
/// Per-transaction view of the world state.
///
/// Reads take `&self` and writes take `&mut self`, so no write can be
/// issued while a scope still borrows the ledger for an open iterator.
///

pub trait Ledger {
    type StateIter: LedgerIterator<KeyValue>;
    type HistoryIter: LedgerIterator<KeyModification>;

    /// Identifier of the transaction this view belongs to.
    fn tx_id(&self) -> &str;

    /// Read a key; `None` when absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    fn delete_state(&mut self, key: &str) -> Result<(), LedgerError>;

    fn create_composite_key(
        &self,
        object_type: &str,
        attributes: &[&str],
    ) -> Result<String, LedgerError> {
        Ok(composite::create(object_type, attributes)?)
    }

    fn split_composite_key(&self, key: &str) -> Result<(String, Vec<String>), LedgerError> {
        Ok(composite::split(key)?)
    }

    /// Scan primary keys in `[start, end)`. Empty bounds are open.
    fn get_state_by_range(&self, start: &str, end: &str) -> Result<Self::StateIter, LedgerError>;

    /// Scan composite keys sharing the `(object_type, attributes..)` prefix.
    fn get_state_by_partial_composite_key(
        &self,
        object_type: &str,
        attributes: &[&str],
    ) -> Result<Self::StateIter, LedgerError>;

    /// Execute an opaque rich query.
    fn get_query_result(&self, query: &str) -> Result<Self::StateIter, LedgerError>;

    /// Every recorded version of `key`.
    fn get_history_for_key(&self, key: &str) -> Result<Self::HistoryIter, LedgerError>;

    fn get_state_by_range_with_pagination(
        &self,
        start: &str,
        end: &str,
        page_size: u32,
        bookmark: &str,
    ) -> Result<(Self::StateIter, QueryResponseMetadata), LedgerError>;

    fn get_query_result_with_pagination(
        &self,
        query: &str,
        page_size: u32,
        bookmark: &str,
    ) -> Result<(Self::StateIter, QueryResponseMetadata), LedgerError>;
}
