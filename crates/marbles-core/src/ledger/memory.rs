//! In-memory reference ledger.
//!
//! A test double for the host ledger: committed world state in ordered maps,
//! one staged write set per transaction, and just enough of the rich-query
//! selector language (top-level equality) to exercise the contract.
//! It is not a storage engine: nothing is persisted and nothing is validated
//! beyond what the contract relies on.

use crate::ledger::{
    KeyModification, KeyValue, Ledger, LedgerError, LedgerIterator, QueryResponseMetadata,
    Timestamp, composite,
};
use serde_json::{Map, Value as JsonValue};
use sha2::{Digest, Sha256};
use std::{cell::Cell, collections::BTreeMap, rc::Rc};

///
/// MemoryLedger
///

#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: BTreeMap<String, Vec<u8>>,
    history: BTreeMap<String, Vec<KeyModification>>,
    pending: Option<PendingTx>,
    tx_id: String,
    sequence: u64,
    open_iterators: Rc<Cell<usize>>,
}

///
/// PendingTx
/// Staged write set; `None` values are deletes.
///

#[derive(Debug)]
struct PendingTx {
    timestamp: Timestamp,
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` as one transaction: writes are committed when it returns
    /// `Ok` and discarded when it returns `Err`.
    pub fn submit<T, E>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E> {
        self.begin();
        let result = f(self);

        match result {
            Ok(value) => {
                self.commit();
                Ok(value)
            }
            Err(err) => {
                self.pending = None;
                Err(err)
            }
        }
    }

    /// Number of committed keys, composite keys included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Iterators handed out and not yet closed.
    #[must_use]
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.get()
    }

    /// Writes staged by the open transaction.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.pending.as_ref().map_or(0, |tx| tx.writes.len())
    }

    /// Committed keys in order, composite keys included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.state.keys().map(String::as_str)
    }

    fn begin(&mut self) {
        self.sequence += 1;
        self.tx_id = format!("{:x}", Sha256::digest(format!("tx-{}", self.sequence)));
        self.pending = Some(PendingTx {
            timestamp: Timestamp::now(),
            writes: BTreeMap::new(),
        });
    }

    fn commit(&mut self) {
        let Some(tx) = self.pending.take() else {
            return;
        };

        for (key, write) in tx.writes {
            let is_delete = write.is_none();
            let value = match write {
                Some(value) => {
                    self.state.insert(key.clone(), value.clone());
                    value
                }
                None => {
                    self.state.remove(&key);
                    Vec::new()
                }
            };

            self.history.entry(key).or_default().push(KeyModification {
                tx_id: self.tx_id.clone(),
                timestamp: tx.timestamp,
                is_delete,
                value,
            });
        }
    }

    fn stage(&mut self, key: &str, write: Option<Vec<u8>>) -> Result<(), LedgerError> {
        let Some(tx) = self.pending.as_mut() else {
            return Err(LedgerError::NoTransaction {
                key: key.to_string(),
            });
        };
        tx.writes.insert(key.to_string(), write);

        Ok(())
    }

    fn iter<T>(&self, items: Vec<T>) -> MemoryIter<T> {
        MemoryIter::new(items, self.open_iterators.clone())
    }

    fn range_entries(&self, start: &str, end: &str) -> Vec<KeyValue> {
        self.state
            .iter()
            .filter(|(key, _)| !composite::is_composite(key))
            .filter(|(key, _)| start.is_empty() || key.as_str() >= start)
            .filter(|(key, _)| end.is_empty() || key.as_str() < end)
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
            .collect()
    }

    fn query_entries(&self, query: &str) -> Result<Vec<KeyValue>, LedgerError> {
        let selector = Selector::parse(query)?;

        Ok(self
            .state
            .iter()
            .filter(|(key, _)| !composite::is_composite(key))
            .filter(|(_, value)| selector.matches(value))
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
            .collect())
    }
}

impl Ledger for MemoryLedger {
    type StateIter = MemoryIter<KeyValue>;
    type HistoryIter = MemoryIter<KeyModification>;

    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::Call("key must not be empty".to_string()));
        }
        if value.is_empty() {
            return Err(LedgerError::Call(format!(
                "value for key '{key}' must not be empty"
            )));
        }

        self.stage(key, Some(value))
    }

    fn delete_state(&mut self, key: &str) -> Result<(), LedgerError> {
        self.stage(key, None)
    }

    fn get_state_by_range(&self, start: &str, end: &str) -> Result<Self::StateIter, LedgerError> {
        Ok(self.iter(self.range_entries(start, end)))
    }

    fn get_state_by_partial_composite_key(
        &self,
        object_type: &str,
        attributes: &[&str],
    ) -> Result<Self::StateIter, LedgerError> {
        let prefix = self.create_composite_key(object_type, attributes)?;
        let entries = self
            .state
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
            .collect();

        Ok(self.iter(entries))
    }

    fn get_query_result(&self, query: &str) -> Result<Self::StateIter, LedgerError> {
        Ok(self.iter(self.query_entries(query)?))
    }

    fn get_history_for_key(&self, key: &str) -> Result<Self::HistoryIter, LedgerError> {
        let versions = self.history.get(key).cloned().unwrap_or_default();

        Ok(self.iter(versions))
    }

    fn get_state_by_range_with_pagination(
        &self,
        start: &str,
        end: &str,
        page_size: u32,
        bookmark: &str,
    ) -> Result<(Self::StateIter, QueryResponseMetadata), LedgerError> {
        let (page, metadata) = paginate(self.range_entries(start, end), page_size, bookmark)?;

        Ok((self.iter(page), metadata))
    }

    fn get_query_result_with_pagination(
        &self,
        query: &str,
        page_size: u32,
        bookmark: &str,
    ) -> Result<(Self::StateIter, QueryResponseMetadata), LedgerError> {
        let (page, metadata) = paginate(self.query_entries(query)?, page_size, bookmark)?;

        Ok((self.iter(page), metadata))
    }
}

// Bookmarks are the key of the first entry of the next page.
fn paginate(
    entries: Vec<KeyValue>,
    page_size: u32,
    bookmark: &str,
) -> Result<(Vec<KeyValue>, QueryResponseMetadata), LedgerError> {
    if page_size == 0 {
        return Err(LedgerError::Call("page size must be positive".to_string()));
    }

    let mut rest = entries
        .into_iter()
        .skip_while(|entry| !bookmark.is_empty() && entry.key.as_str() < bookmark);

    let page: Vec<KeyValue> = rest.by_ref().take(page_size as usize).collect();
    let next = rest.next().map(|entry| entry.key).unwrap_or_default();

    #[expect(clippy::cast_possible_truncation)]
    let metadata = QueryResponseMetadata {
        fetched_records_count: page.len() as u32,
        bookmark: next,
    };

    Ok((page, metadata))
}

///
/// MemoryIter
/// Vec-backed ledger iterator with open/close accounting.
///

#[derive(Debug)]
pub struct MemoryIter<T> {
    items: std::vec::IntoIter<T>,
    open: Rc<Cell<usize>>,
    closed: bool,
}

impl<T> MemoryIter<T> {
    fn new(items: Vec<T>, open: Rc<Cell<usize>>) -> Self {
        open.set(open.get() + 1);

        Self {
            items: items.into_iter(),
            open,
            closed: false,
        }
    }
}

impl<T> Iterator for MemoryIter<T> {
    type Item = Result<T, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }

        self.items.next().map(Ok)
    }
}

impl<T> LedgerIterator<T> for MemoryIter<T> {
    fn close(&mut self) -> Result<(), LedgerError> {
        if !self.closed {
            self.closed = true;
            self.open.set(self.open.get().saturating_sub(1));
        }

        Ok(())
    }
}

///
/// Selector
/// Top-level equality selector: `{"selector": {"field": scalar, ..}}`.
///

#[derive(Debug)]
struct Selector(Map<String, JsonValue>);

impl Selector {
    fn parse(query: &str) -> Result<Self, LedgerError> {
        let unsupported = |reason: &str| LedgerError::UnsupportedQuery(format!("{reason}: {query}"));

        let JsonValue::Object(mut root) =
            serde_json::from_str::<JsonValue>(query).map_err(|_| unsupported("not JSON"))?
        else {
            return Err(unsupported("query must be a JSON object"));
        };

        let Some(JsonValue::Object(selector)) = root.remove("selector") else {
            return Err(unsupported("query must contain a selector object"));
        };
        if !root.is_empty() {
            return Err(unsupported("only the selector clause is supported"));
        }
        if selector
            .values()
            .any(|value| value.is_object() || value.is_array())
        {
            return Err(unsupported("only equality on scalar fields is supported"));
        }

        Ok(Self(selector))
    }

    fn matches(&self, value: &[u8]) -> bool {
        let Ok(JsonValue::Object(record)) = serde_json::from_slice::<JsonValue>(value) else {
            return false;
        };

        self.0
            .iter()
            .all(|(field, expected)| record.get(field) == Some(expected))
    }
}
