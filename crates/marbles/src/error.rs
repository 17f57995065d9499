use crate::config::ConfigError;
use candid::CandidType;
use derive_more::Display;
use marbles_core::error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self::new(err.class.into(), err.origin.into(), err.message)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::InvalidArgument, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for invoking hosts.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Wrong arity or an empty/malformed argument.
    InvalidArgument,

    /// A marble with this name already exists.
    AlreadyExists,

    /// No marble with this name.
    NotFound,

    /// A stored record could not be decoded.
    Decode,

    /// The caller cannot remediate this.
    Internal,

    /// No handler is registered under the invoked name.
    UnknownOperation,
}

impl From<ErrorClass> for ErrorKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::InvalidArgument => Self::InvalidArgument,
            ErrorClass::AlreadyExists => Self::AlreadyExists,
            ErrorClass::NotFound => Self::NotFound,
            ErrorClass::Decode => Self::Decode,
            ErrorClass::Internal => Self::Internal,
            ErrorClass::UnknownOperation => Self::UnknownOperation,
        }
    }
}

///
/// ErrorOrigin
/// Public origin taxonomy for invoking hosts.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Argument,
    Entity,
    Index,
    Query,
    Aggregate,
    Ledger,
    Dispatch,
    Config,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Argument => Self::Argument,
            CoreErrorOrigin::Entity => Self::Entity,
            CoreErrorOrigin::Index => Self::Index,
            CoreErrorOrigin::Query => Self::Query,
            CoreErrorOrigin::Aggregate => Self::Aggregate,
            CoreErrorOrigin::Ledger => Self::Ledger,
            CoreErrorOrigin::Dispatch => Self::Dispatch,
            CoreErrorOrigin::Config => Self::Config,
        }
    }
}
