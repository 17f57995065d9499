//! `color~name` secondary index.
//!
//! Every index key is built and parsed here so the key format is defined in
//! one place. Entries carry a one-byte sentinel value; their presence is the
//! information.


use crate::{
    error::InternalError,
    ledger::{KeyValue, Ledger, ScopedIterator},
    obs::{MetricsEvent, ScanKind, record},
};

/// Composite-key object type of the index.
pub const INDEX_NAME: &str = "color~name";

/// Value stored under every index key.
pub const SENTINEL: [u8; 1] = [0x00];

/// Scope over a partial index scan.
pub type IndexScan<L> = ScopedIterator<<L as Ledger>::StateIter, KeyValue>;

pub fn build_index_key<L>(ledger: &L, color: &str, name: &str) -> Result<String, InternalError>
where
    L: Ledger + ?Sized,
{
    ledger
        .create_composite_key(INDEX_NAME, &[color, name])
        .map_err(|err| InternalError::index_internal(format!("failed to build index key: {err}")))
}

/// Recover `(color, name)` from an index key.
pub fn parse_index_key<L>(ledger: &L, key: &str) -> Result<(String, String), InternalError>
where
    L: Ledger + ?Sized,
{
    let (object_type, attributes) = ledger
        .split_composite_key(key)
        .map_err(|err| InternalError::index_internal(format!("failed to split index key: {err}")))?;

    if object_type != INDEX_NAME {
        return Err(InternalError::index_internal(format!(
            "key belongs to index '{object_type}', expected '{INDEX_NAME}'"
        )));
    }

    match <[String; 2]>::try_from(attributes) {
        Ok([color, name]) => Ok((color, name)),
        Err(attributes) => Err(InternalError::index_internal(format!(
            "index key has {} attributes, expected 2",
            attributes.len()
        ))),
    }
}

/// Write the index entry under a key from `build_index_key`.
pub fn insert<L: Ledger>(ledger: &mut L, key: &str) -> Result<(), InternalError> {
    ledger.put_state(key, SENTINEL.to_vec())?;

    record(MetricsEvent::IndexDelta {
        inserts: 1,
        removes: 0,
    });

    Ok(())
}

/// Remove the index entry under a key from `build_index_key`.
pub fn remove<L: Ledger>(ledger: &mut L, key: &str) -> Result<(), InternalError> {
    ledger.delete_state(key)?;

    record(MetricsEvent::IndexDelta {
        inserts: 0,
        removes: 1,
    });

    Ok(())
}

/// Open a scan over every index entry of `color`.
pub fn scan_color<L: Ledger>(ledger: &L, color: &str) -> Result<IndexScan<L>, InternalError> {
    let inner = ledger.get_state_by_partial_composite_key(INDEX_NAME, &[color])?;

    Ok(ScopedIterator::new(ScanKind::PartialKey, inner))
}

/// Names of every marble indexed under `color`, in index order.
///
/// The scan is drained and closed before returning.
pub fn names_for_color<L: Ledger>(ledger: &L, color: &str) -> Result<Vec<String>, InternalError> {
    let mut scan = scan_color(ledger, color)?;
    let mut names = Vec::new();

    for entry in scan.by_ref() {
        let entry = entry?;
        let (_, name) = parse_index_key(ledger, &entry.key)?;
        names.push(name);
    }
    scan.finish()?;

    record(MetricsEvent::RowsScanned {
        scan: ScanKind::PartialKey,
        returned: names.len() as u64,
        skipped: 0,
    });

    Ok(names)
}
