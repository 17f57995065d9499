use super::*;
use crate::{
    entity::{create, load},
    error::{ErrorClass, ErrorOrigin},
    ledger::memory::MemoryLedger,
    model::Marble,
};
use serde_json::Value as JsonValue;

fn seeded() -> MemoryLedger {
    let mut ledger = MemoryLedger::new();
    ledger
        .submit(|l| {
            create(l, &Marble::new("marble1", "blue", 35, "tom"))?;
            create(l, &Marble::new("marble2", "red", 50, "tom"))?;
            create(l, &Marble::new("marble3", "blue", 70, "jerry"))?;
            create(l, &Marble::new("marble4", "green", 10, "ann"))
        })
        .unwrap();

    ledger
}

fn parse(bytes: &[u8]) -> JsonValue {
    serde_json::from_slice(bytes).unwrap()
}

fn keys(payload: &JsonValue) -> Vec<&str> {
    payload
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["Key"].as_str().unwrap())
        .collect()
}

#[test]
fn range_query_is_half_open_and_ordered() {
    let ledger = seeded();

    let payload = parse(&range_query(&ledger, "marble1", "marble3").unwrap());

    assert_eq!(keys(&payload), ["marble1", "marble2"]);
    assert_eq!(payload[0]["Record"]["size"], 35);
    assert_eq!(ledger.open_iterators(), 0);
}

#[test]
fn range_query_excludes_index_entries_and_handles_empty_interval() {
    let ledger = seeded();

    let all = parse(&range_query(&ledger, "", "").unwrap());
    assert_eq!(keys(&all), ["marble1", "marble2", "marble3", "marble4"]);

    let none = parse(&range_query(&ledger, "x", "z").unwrap());
    assert_eq!(none, serde_json::json!([]));
}

#[test]
fn query_by_owner_case_folds_owner() {
    let ledger = seeded();

    let payload = parse(&query_by_owner(&ledger, "TOM").unwrap());

    assert_eq!(keys(&payload), ["marble1", "marble2"]);
}

#[test]
fn owner_selector_scopes_to_marbles() {
    let selector: JsonValue = serde_json::from_str(&owner_selector("Ann").unwrap()).unwrap();

    assert_eq!(
        selector,
        serde_json::json!({"selector": {"docType": "marble", "owner": "ann"}})
    );
    assert_eq!(
        owner_selector("").unwrap_err().class,
        ErrorClass::InvalidArgument
    );
}

#[test]
fn rich_query_rejects_empty_and_surfaces_ledger_errors() {
    let ledger = seeded();

    assert_eq!(
        rich_query(&ledger, "").unwrap_err().class,
        ErrorClass::InvalidArgument
    );

    let err = rich_query(&ledger, r#"{"selector":{"size":{"$gt":10}}}"#).unwrap_err();
    assert_eq!(err.origin, ErrorOrigin::Ledger);
}

#[test]
fn history_lists_versions_oldest_first() {
    let mut ledger = seeded();
    ledger
        .submit(|l| entity::transfer(l, "marble1", "jerry"))
        .unwrap();

    let payload = parse(&history_query(&ledger, "marble1").unwrap());
    let owners: Vec<&str> = payload
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["Value"]["owner"].as_str().unwrap())
        .collect();

    assert_eq!(owners, ["tom", "jerry"]);
    assert_eq!(payload[0]["IsDelete"], "false");
    assert!(payload[0]["Timestamp"]["seconds"].is_i64());
}

#[test]
fn paged_range_walks_every_record_once() {
    let ledger = seeded();
    let mut seen = Vec::new();
    let mut bookmark = String::new();

    loop {
        let page = PageRequest::new(3, &bookmark).unwrap();
        let payload = parse(&range_query_paged(&ledger, "", "", page).unwrap());
        let records = payload["Records"].as_array().unwrap();
        let meta = &payload["ResponseMetadata"];

        assert_eq!(meta["RecordsCount"].as_u64().unwrap() as usize, records.len());
        seen.extend(records.iter().map(|r| r["Key"].as_str().unwrap().to_string()));

        bookmark = meta["Bookmark"].as_str().unwrap().to_string();
        if bookmark.is_empty() {
            break;
        }
    }

    assert_eq!(seen, ["marble1", "marble2", "marble3", "marble4"]);
    assert_eq!(ledger.open_iterators(), 0);
}

#[test]
fn paged_rich_query_copies_ledger_metadata() {
    let ledger = seeded();
    let query = owner_selector("tom").unwrap();

    let payload = parse(&rich_query_paged(&ledger, &query, PageRequest::first(1)).unwrap());

    assert_eq!(payload["Records"][0]["Key"], "marble1");
    assert_eq!(payload["ResponseMetadata"]["RecordsCount"], 1);
    assert_eq!(payload["ResponseMetadata"]["Bookmark"], "marble2");
}

#[test]
fn zero_page_size_is_rejected() {
    assert_eq!(
        PageRequest::new(0, "").unwrap_err(),
        ArgumentError::NotPositive { field: "pageSize" }
    );
}

#[test]
fn bulk_transfer_moves_only_matching_color() {
    let mut ledger = seeded();

    let moved = ledger
        .submit(|l| bulk_transfer_by_color(l, "Blue", "Zed"))
        .unwrap();

    assert_eq!(moved, 2);
    assert_eq!(load(&ledger, "marble1").unwrap().owner(), Some("zed"));
    assert_eq!(load(&ledger, "marble3").unwrap().owner(), Some("zed"));
    assert_eq!(load(&ledger, "marble2").unwrap().owner(), Some("tom"));
    assert_eq!(load(&ledger, "marble4").unwrap().owner(), Some("ann"));
    assert_eq!(ledger.open_iterators(), 0);
}

#[test]
fn bulk_transfer_with_no_matches_is_a_no_op() {
    let mut ledger = seeded();
    let before: Vec<String> = ledger.keys().map(str::to_string).collect();

    let moved = ledger
        .submit(|l| bulk_transfer_by_color(l, "purple", "zed"))
        .unwrap();

    assert_eq!(moved, 0);
    assert_eq!(ledger.keys().map(str::to_string).collect::<Vec<_>>(), before);
}

#[test]
fn bulk_transfer_aborts_on_first_failure() {
    let mut ledger = seeded();
    // index entry whose record is missing
    ledger
        .submit(|l| {
            let key = index::build_index_key(l, "blue", "marble2a")?;
            l.put_state(&key, index::SENTINEL.to_vec())?;
            Ok::<_, InternalError>(())
        })
        .unwrap();

    let err = ledger
        .submit(|l| bulk_transfer_by_color(l, "blue", "zed"))
        .unwrap_err();

    assert_eq!(err.class, ErrorClass::NotFound);
    // marble1 was transferred inside the failed transaction, which was discarded
    assert_eq!(load(&ledger, "marble1").unwrap().owner(), Some("tom"));
    assert_eq!(ledger.open_iterators(), 0);
}
