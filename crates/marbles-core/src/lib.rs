//! Core ledger layer for the marbles asset registry: the marble entity, its
//! `color~name` secondary index, result aggregation, and the query engine,
//! all written against the [`ledger::Ledger`] collaborator trait.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod index;
pub mod ledger;
pub mod model;
pub mod obs;
pub mod query;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        aggregate::{QueryRecord, Records, ResultMode},
        error::{ErrorClass, ErrorOrigin, InternalError},
        ledger::{KeyModification, KeyValue, Ledger, LedgerError, LedgerIterator, Timestamp},
        model::{DOC_TYPE, Marble},
        query::PageRequest,
    };
}
