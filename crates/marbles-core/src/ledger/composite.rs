//! Composite key encoding.
//!
//! Layout: `0x00 object_type 0x00 (attribute 0x00)*`. The leading null byte
//! keeps composite keys out of plain range scans over primary keys, and the
//! trailing separator after each attribute makes prefix scans exact.

use thiserror::Error as ThisError;

/// First byte of every composite key.
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

/// Highest code point; reserved as the open upper bound of prefix scans.
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

///
/// CompositeKeyError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum CompositeKeyError {
    #[error("composite key object type must not be empty")]
    EmptyObjectType,

    #[error("composite key component '{component}' contains reserved character U+{code:04X}")]
    ReservedCharacter { component: String, code: u32 },

    #[error("key is not a composite key: {0:?}")]
    NotComposite(String),

    #[error("composite key is missing its trailing separator: {0:?}")]
    Unterminated(String),
}

/// Build a composite key from an object type and ordered attributes.
pub fn create(object_type: &str, attributes: &[&str]) -> Result<String, CompositeKeyError> {
    if object_type.is_empty() {
        return Err(CompositeKeyError::EmptyObjectType);
    }
    validate_component(object_type)?;

    let capacity = 2 + object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>();
    let mut key = String::with_capacity(capacity);
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(object_type);
    key.push(COMPOSITE_KEY_NAMESPACE);

    for attribute in attributes {
        validate_component(attribute)?;
        key.push_str(attribute);
        key.push(COMPOSITE_KEY_NAMESPACE);
    }

    Ok(key)
}

/// Split a composite key back into its object type and attributes.
pub fn split(key: &str) -> Result<(String, Vec<String>), CompositeKeyError> {
    let Some(body) = key.strip_prefix(COMPOSITE_KEY_NAMESPACE) else {
        return Err(CompositeKeyError::NotComposite(key.to_string()));
    };
    let Some(body) = body.strip_suffix(COMPOSITE_KEY_NAMESPACE) else {
        return Err(CompositeKeyError::Unterminated(key.to_string()));
    };

    let mut parts = body.split(COMPOSITE_KEY_NAMESPACE).map(str::to_string);
    let object_type = parts.next().unwrap_or_default();
    if object_type.is_empty() {
        return Err(CompositeKeyError::EmptyObjectType);
    }

    Ok((object_type, parts.collect()))
}

/// True when `key` lives in the composite key namespace.
#[must_use]
pub fn is_composite(key: &str) -> bool {
    key.starts_with(COMPOSITE_KEY_NAMESPACE)
}

fn validate_component(component: &str) -> Result<(), CompositeKeyError> {
    match component
        .chars()
        .find(|c| *c == COMPOSITE_KEY_NAMESPACE || *c == MAX_UNICODE_RUNE)
    {
        Some(c) => Err(CompositeKeyError::ReservedCharacter {
            component: component.to_string(),
            code: u32::from(c),
        }),
        None => Ok(()),
    }
}
