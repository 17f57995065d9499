//! Marbles asset registry contract.
//!
//! Wraps the `marbles-core` ledger layer with name-based dispatch, host
//! configuration, a stable public error type, and the response envelope.

pub mod config;
pub mod contract;
pub mod error;
pub mod response;

// re-exports
pub use config::{ConfigError, ContractConfig};
pub use contract::Contract;
pub use error::{Error, ErrorKind, ErrorOrigin};
pub use response::Response;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{Contract, ContractConfig, Error, ErrorKind, Response};
    pub use marbles_core::ledger::{Ledger, LedgerIterator};
}
