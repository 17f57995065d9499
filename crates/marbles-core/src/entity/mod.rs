//! Single-marble operations.
//!
//! Writes keep the primary record and its `color~name` index entry in step:
//! create and delete always issue the paired index write in the same
//! transaction, and the index key is built before either write is staged.
//! Transfer only changes the owner, which is not indexed.

#[cfg(test)]
mod tests;

use crate::{
    error::InternalError,
    index,
    ledger::Ledger,
    model::{Marble, MarbleRecord, require},
    obs::{MetricsEvent, WriteKind, record},
};

/// Store a new marble and its index entry.
pub fn create<L: Ledger>(ledger: &mut L, marble: &Marble) -> Result<(), InternalError> {
    require("name", &marble.name)?;

    if ledger.get_state(&marble.name)?.is_some() {
        return Err(InternalError::already_exists(&marble.name));
    }

    let index_key = index::build_index_key(ledger, &marble.color, &marble.name)?;
    let bytes = marble.to_bytes()?;

    ledger.put_state(&marble.name, bytes)?;
    index::insert(ledger, &index_key)?;

    record(MetricsEvent::EntityWrite {
        kind: WriteKind::Create,
    });

    Ok(())
}

/// Stored bytes of a marble, unchanged.
pub fn read<L: Ledger>(ledger: &L, name: &str) -> Result<Vec<u8>, InternalError> {
    require("name", name)?;

    ledger
        .get_state(name)?
        .ok_or_else(|| InternalError::not_found(name))
}

/// Read and decode a stored marble record.
pub fn load<L: Ledger>(ledger: &L, name: &str) -> Result<MarbleRecord, InternalError> {
    let bytes = read(ledger, name)?;

    MarbleRecord::from_bytes(name, &bytes)
}

/// Remove a marble and its index entry, returning the removed record.
pub fn delete<L: Ledger>(ledger: &mut L, name: &str) -> Result<MarbleRecord, InternalError> {
    let marble = load(ledger, name)?;
    let index_key = index::build_index_key(ledger, &marble.color, name)?;

    ledger.delete_state(name)?;
    index::remove(ledger, &index_key)?;

    record(MetricsEvent::EntityWrite {
        kind: WriteKind::Delete,
    });

    Ok(marble)
}

/// Hand a marble to `new_owner`, returning the updated record.
pub fn transfer<L: Ledger>(
    ledger: &mut L,
    name: &str,
    new_owner: &str,
) -> Result<MarbleRecord, InternalError> {
    require("name", name)?;
    require("owner", new_owner)?;

    let mut marble = load(ledger, name)?;
    marble.set_owner(new_owner);
    ledger.put_state(name, marble.to_bytes()?)?;

    record(MetricsEvent::EntityWrite {
        kind: WriteKind::Transfer,
    });

    Ok(marble)
}
