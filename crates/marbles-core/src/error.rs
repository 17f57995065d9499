use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Every failure the contract surfaces to its host is one of these; the
/// public facade maps it onto its own serializable error type.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Wrong arity or an empty/malformed argument.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvalidArgument,
            ErrorOrigin::Argument,
            message.into(),
        )
    }

    /// Duplicate primary key on create.
    pub fn already_exists(name: &str) -> Self {
        Self::new(
            ErrorClass::AlreadyExists,
            ErrorOrigin::Entity,
            format!("this marble already exists: {name}"),
        )
    }

    /// Missing primary key on read, delete or transfer.
    pub fn not_found(name: &str) -> Self {
        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Entity,
            format!("marble does not exist: {name}"),
        )
    }

    /// Stored bytes could not be decoded where decoding is required.
    pub fn decode(name: &str, err: impl fmt::Display) -> Self {
        Self::new(
            ErrorClass::Decode,
            ErrorOrigin::Entity,
            format!("failed to decode JSON of: {name} ({err})"),
        )
    }

    /// Construct an index-origin internal error.
    pub fn index_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Index, message.into())
    }

    /// Construct a query-origin internal error.
    pub fn query_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Query, message.into())
    }

    /// Construct an aggregate-origin internal error.
    pub fn aggregate_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Aggregate, message.into())
    }

    /// Construct a ledger-origin internal error.
    pub fn ledger_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Ledger, message.into())
    }

    /// Dispatch on a function name with no registered handler.
    pub fn unknown_operation(name: &str) -> Self {
        Self::new(
            ErrorClass::UnknownOperation,
            ErrorOrigin::Dispatch,
            format!("received unknown function {name} invocation"),
        )
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
/// Runtime error taxonomy surfaced to the invoking host.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidArgument,
    AlreadyExists,
    NotFound,
    Decode,
    Internal,
    UnknownOperation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::AlreadyExists => "already_exists",
            Self::NotFound => "not_found",
            Self::Decode => "decode",
            Self::Internal => "internal",
            Self::UnknownOperation => "unknown_operation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Component that raised the error.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
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

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Argument => "argument",
            Self::Entity => "entity",
            Self::Index => "index",
            Self::Query => "query",
            Self::Aggregate => "aggregate",
            Self::Ledger => "ledger",
            Self::Dispatch => "dispatch",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_class_includes_origin_and_class() {
        let err = InternalError::not_found("marble1");

        assert_eq!(
            err.display_with_class(),
            "entity:not_found: marble does not exist: marble1"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn unknown_operation_is_dispatch_origin() {
        let err = InternalError::unknown_operation("explode");

        assert_eq!(err.class, ErrorClass::UnknownOperation);
        assert_eq!(err.origin, ErrorOrigin::Dispatch);
        assert!(err.message.contains("explode"));
    }

    #[test]
    fn decode_carries_source_text() {
        let err = InternalError::decode("marble1", "expected value at line 1");

        assert_eq!(err.class, ErrorClass::Decode);
        assert!(err.to_string().contains("marble1"));
        assert!(err.to_string().contains("expected value"));
    }
}
