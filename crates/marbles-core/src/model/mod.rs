//! Marble entity and argument validation.

#[cfg(test)]
mod tests;

use crate::error::InternalError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error as ThisError;

/// Type tag stored on every marble record; scopes rich queries.
pub const DOC_TYPE: &str = "marble";

///
/// ArgumentError
/// Malformed invocation arguments.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ArgumentError {
    #[error("incorrect number of arguments for {operation}: expecting {expected}, got {got}")]
    Arity {
        operation: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{field} must be a non-empty string")]
    Empty { field: &'static str },

    #[error("{field} must be a numeric string, got '{value}'")]
    NotInteger { field: &'static str, value: String },

    #[error("{field} must be a positive integer")]
    NotPositive { field: &'static str },

    #[error("{field} must not exceed {max}, got {got}")]
    TooLarge {
        field: &'static str,
        max: u64,
        got: u64,
    },
}

impl From<ArgumentError> for InternalError {
    fn from(err: ArgumentError) -> Self {
        Self::invalid_argument(err.to_string())
    }
}

/// Reject an empty argument.
pub fn require(field: &'static str, value: &str) -> Result<(), ArgumentError> {
    if value.is_empty() {
        return Err(ArgumentError::Empty { field });
    }

    Ok(())
}

/// Parse a strictly positive integer argument.
pub fn positive_integer(field: &'static str, value: &str) -> Result<u64, ArgumentError> {
    require(field, value)?;

    let parsed = value
        .trim()
        .parse::<i128>()
        .map_err(|_| ArgumentError::NotInteger {
            field,
            value: value.to_string(),
        })?;

    match u64::try_from(parsed) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ArgumentError::NotPositive { field }),
    }
}

///
/// Marble
///
/// Stored as JSON under its name. Field order is the serialized order:
/// `docType, name, color, size, owner`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Marble {
    #[serde(rename = "docType")]
    pub doc_type: String,
    pub name: String,
    pub color: String,
    pub size: u64,
    pub owner: String,
}

impl Marble {
    /// Build a marble from already-validated parts, case-folding color and
    /// owner.
    #[must_use]
    pub fn new(name: &str, color: &str, size: u64, owner: &str) -> Self {
        Self {
            doc_type: DOC_TYPE.to_string(),
            name: name.to_string(),
            color: color.to_lowercase(),
            size,
            owner: owner.to_lowercase(),
        }
    }

    /// Validate raw invocation arguments and build a marble.
    pub fn parse(name: &str, color: &str, size: &str, owner: &str) -> Result<Self, ArgumentError> {
        require("name", name)?;
        require("color", color)?;
        require("size", size)?;
        require("owner", owner)?;
        let size = positive_integer("size", size)?;

        Ok(Self::new(name, color, size, owner))
    }

    /// Replace the owner, case-folded.
    pub fn set_owner(&mut self, owner: &str) {
        self.owner = owner.to_lowercase();
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, InternalError> {
        serde_json::to_vec(self).map_err(|err| {
            InternalError::ledger_internal(format!("failed to encode marble {}: {err}", self.name))
        })
    }

    /// Decode a stored record; `key` names the record in the error.
    pub fn from_bytes(key: &str, bytes: &[u8]) -> Result<Self, InternalError> {
        serde_json::from_slice(bytes).map_err(|err| InternalError::decode(key, err))
    }
}

///
/// MarbleRecord
///
/// A marble as stored on the ledger. Only `color` is required. Fields this
/// crate does not model are carried through, and a rewrite keeps the
/// known fields in their serialized order.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MarbleRecord {
    #[serde(
        rename = "docType",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub doc_type: Option<JsonValue>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<JsonValue>,

    pub color: String,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub size: Option<JsonValue>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub owner: Option<JsonValue>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl MarbleRecord {
    /// Decode a stored record; `key` names the record in the error.
    pub fn from_bytes(key: &str, bytes: &[u8]) -> Result<Self, InternalError> {
        serde_json::from_slice(bytes).map_err(|err| InternalError::decode(key, err))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, InternalError> {
        serde_json::to_vec(self).map_err(|err| {
            InternalError::ledger_internal(format!("failed to encode marble record: {err}"))
        })
    }

    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_ref().and_then(JsonValue::as_str)
    }

    /// Replace the owner, case-folded; nothing else is touched.
    pub fn set_owner(&mut self, owner: &str) {
        self.owner = Some(JsonValue::String(owner.to_lowercase()));
    }
}

// an explicit `null` stays a value instead of collapsing to an absent field
fn present<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}
