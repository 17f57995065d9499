//! Query engine: range, rich, owner, history and paginated queries, plus the
//! index-driven bulk transfer.
//!
//! Read-only queries hold only a shared borrow of the ledger while their
//! iterator is open. Every query returns its JSON payload as bytes.

#[cfg(test)]
mod tests;

use crate::{
    aggregate::{Records, ResultMode, aggregate},
    entity,
    error::InternalError,
    index,
    ledger::{Ledger, QueryResponseMetadata, ScopedIterator},
    model::{ArgumentError, DOC_TYPE, require},
    obs::ScanKind,
};
use serde::Serialize;
use serde_json::json;

///
/// PageRequest
/// Page size plus the bookmark returned by the previous page
/// (empty for the first page).
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageRequest<'a> {
    pub page_size: u32,
    pub bookmark: &'a str,
}

impl<'a> PageRequest<'a> {
    pub fn new(page_size: u32, bookmark: &'a str) -> Result<Self, ArgumentError> {
        if page_size == 0 {
            return Err(ArgumentError::NotPositive { field: "pageSize" });
        }

        Ok(Self {
            page_size,
            bookmark,
        })
    }

    #[must_use]
    pub const fn first(page_size: u32) -> Self {
        Self {
            page_size,
            bookmark: "",
        }
    }
}

///
/// ResponseMetadata
/// Page accounting, copied from the ledger.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseMetadata {
    pub records_count: u32,
    pub bookmark: String,
}

impl From<QueryResponseMetadata> for ResponseMetadata {
    fn from(meta: QueryResponseMetadata) -> Self {
        Self {
            records_count: meta.fetched_records_count,
            bookmark: meta.bookmark,
        }
    }
}

///
/// PagedResults
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PagedResults {
    pub records: Records,
    pub response_metadata: ResponseMetadata,
}

impl PagedResults {
    pub fn to_json(&self) -> Result<Vec<u8>, InternalError> {
        serde_json::to_vec(self)
            .map_err(|err| InternalError::query_internal(format!("failed to encode page: {err}")))
    }
}

/// Primary records with keys in `[start, end)`; empty bounds are open.
pub fn range_query<L: Ledger>(ledger: &L, start: &str, end: &str) -> Result<Vec<u8>, InternalError> {
    let scope = ScopedIterator::new(ScanKind::Range, ledger.get_state_by_range(start, end)?);

    aggregate(scope, ResultMode::Standard)?.to_json()
}

/// Records matched by an opaque rich query.
pub fn rich_query<L: Ledger>(ledger: &L, query: &str) -> Result<Vec<u8>, InternalError> {
    require("query", query)?;
    let scope = ScopedIterator::new(ScanKind::Rich, ledger.get_query_result(query)?);

    aggregate(scope, ResultMode::Standard)?.to_json()
}

/// Selector for every marble held by `owner` (case-folded).
pub fn owner_selector(owner: &str) -> Result<String, InternalError> {
    require("owner", owner)?;

    Ok(json!({
        "selector": {
            "docType": DOC_TYPE,
            "owner": owner.to_lowercase(),
        }
    })
    .to_string())
}

pub fn query_by_owner<L: Ledger>(ledger: &L, owner: &str) -> Result<Vec<u8>, InternalError> {
    rich_query(ledger, &owner_selector(owner)?)
}

/// Every recorded version of a marble; deletes are skipped.
pub fn history_query<L: Ledger>(ledger: &L, name: &str) -> Result<Vec<u8>, InternalError> {
    require("name", name)?;
    let scope = ScopedIterator::new(ScanKind::History, ledger.get_history_for_key(name)?);

    aggregate(scope, ResultMode::History)?.to_json()
}

pub fn range_query_paged<L: Ledger>(
    ledger: &L,
    start: &str,
    end: &str,
    page: PageRequest<'_>,
) -> Result<Vec<u8>, InternalError> {
    let (iter, meta) =
        ledger.get_state_by_range_with_pagination(start, end, page.page_size, page.bookmark)?;
    let records = aggregate(ScopedIterator::new(ScanKind::PagedRange, iter), ResultMode::Standard)?;

    PagedResults {
        records,
        response_metadata: meta.into(),
    }
    .to_json()
}

pub fn rich_query_paged<L: Ledger>(
    ledger: &L,
    query: &str,
    page: PageRequest<'_>,
) -> Result<Vec<u8>, InternalError> {
    require("query", query)?;

    let (iter, meta) =
        ledger.get_query_result_with_pagination(query, page.page_size, page.bookmark)?;
    let records = aggregate(ScopedIterator::new(ScanKind::PagedRich, iter), ResultMode::Standard)?;

    PagedResults {
        records,
        response_metadata: meta.into(),
    }
    .to_json()
}

/// Transfer every marble of `color` to `new_owner`; returns the number of
/// marbles transferred.
///
/// The index scan is drained and closed before the first write. Transfers
/// then run in index order and the first failure aborts the batch, leaving
/// the caller to discard the transaction's write set.
pub fn bulk_transfer_by_color<L: Ledger>(
    ledger: &mut L,
    color: &str,
    new_owner: &str,
) -> Result<usize, InternalError> {
    require("color", color)?;
    require("owner", new_owner)?;

    let names = index::names_for_color(ledger, &color.to_lowercase())?;
    for name in &names {
        entity::transfer(ledger, name, new_owner)?;
    }

    Ok(names.len())
}
