use super::*;
use crate::{
    error::{ErrorClass, ErrorOrigin},
    index::{build_index_key, names_for_color},
    ledger::memory::MemoryLedger,
};

fn ledger_with(marbles: &[Marble]) -> MemoryLedger {
    let mut ledger = MemoryLedger::new();
    ledger
        .submit(|l| marbles.iter().try_for_each(|m| create(l, m)))
        .unwrap();

    ledger
}

fn snapshot(ledger: &MemoryLedger) -> Vec<String> {
    ledger.keys().map(str::to_string).collect()
}

fn stored(ledger: &MemoryLedger, name: &str) -> Marble {
    Marble::from_bytes(name, &read(ledger, name).unwrap()).unwrap()
}

#[test]
fn create_then_read_round_trips() {
    let marble = Marble::parse("marble1", "Blue", "35", "Tom").unwrap();
    let ledger = ledger_with(&[marble]);

    assert_eq!(stored(&ledger, "marble1"), Marble::new("marble1", "blue", 35, "tom"));
    assert_eq!(names_for_color(&ledger, "blue").unwrap(), ["marble1"]);
}

#[test]
fn read_returns_stored_bytes_unchanged() {
    let mut ledger = MemoryLedger::new();
    ledger
        .submit(|l| l.put_state("odd", b"  {\"x\": 1}".to_vec()))
        .unwrap();

    assert_eq!(read(&ledger, "odd").unwrap(), b"  {\"x\": 1}".to_vec());
}

#[test]
fn duplicate_create_fails_without_mutation() {
    let mut ledger = ledger_with(&[Marble::new("m1", "red", 1, "tom")]);
    let before = snapshot(&ledger);

    let err = ledger
        .submit(|l| create(l, &Marble::new("m1", "green", 9, "ann")))
        .unwrap_err();

    assert_eq!(err.class, ErrorClass::AlreadyExists);
    assert_eq!(snapshot(&ledger), before);
    assert_eq!(stored(&ledger, "m1").color, "red");
    assert!(names_for_color(&ledger, "green").unwrap().is_empty());
}

#[test]
fn missing_and_empty_names_are_classified() {
    let mut ledger = MemoryLedger::new();

    assert_eq!(read(&ledger, "").unwrap_err().class, ErrorClass::InvalidArgument);
    assert_eq!(read(&ledger, "ghost").unwrap_err().class, ErrorClass::NotFound);

    let err = ledger.submit(|l| delete(l, "ghost")).unwrap_err();
    assert_eq!(err.class, ErrorClass::NotFound);

    let err = ledger.submit(|l| transfer(l, "ghost", "ann")).unwrap_err();
    assert_eq!(err.class, ErrorClass::NotFound);
}

#[test]
fn delete_removes_record_and_index_entry() {
    let mut ledger = ledger_with(&[
        Marble::new("m1", "blue", 1, "tom"),
        Marble::new("m2", "blue", 2, "tom"),
    ]);

    let removed = ledger.submit(|l| delete(l, "m1")).unwrap();

    assert_eq!(removed.color, "blue");
    assert!(load(&ledger, "m1").unwrap_err().is_not_found());
    assert_eq!(names_for_color(&ledger, "blue").unwrap(), ["m2"]);

    let key = build_index_key(&ledger, "blue", "m1").unwrap();
    assert!(ledger.get_state(&key).unwrap().is_none());
}

#[test]
fn delete_of_undecodable_record_is_decode_error() {
    let mut ledger = MemoryLedger::new();
    ledger
        .submit(|l| l.put_state("junk", b"not json".to_vec()))
        .unwrap();

    let err = ledger.submit(|l| delete(l, "junk")).unwrap_err();

    assert_eq!(err.class, ErrorClass::Decode);
    assert!(ledger.get_state("junk").unwrap().is_some());
}

#[test]
fn transfer_changes_only_owner() {
    let mut ledger = ledger_with(&[Marble::new("m1", "blue", 35, "tom")]);

    let updated = ledger.submit(|l| transfer(l, "m1", "JERRY")).unwrap();

    assert_eq!(updated.owner(), Some("jerry"));
    assert_eq!(stored(&ledger, "m1"), Marble::new("m1", "blue", 35, "jerry"));
    assert_eq!(names_for_color(&ledger, "blue").unwrap(), ["m1"]);
}

#[test]
fn transfer_rejects_empty_owner() {
    let mut ledger = ledger_with(&[Marble::new("m1", "blue", 35, "tom")]);

    let err = ledger.submit(|l| transfer(l, "m1", "")).unwrap_err();

    assert_eq!(err.class, ErrorClass::InvalidArgument);
    assert_eq!(stored(&ledger, "m1").owner, "tom");
}

#[test]
fn transfer_keeps_fields_it_does_not_model() {
    let mut ledger = MemoryLedger::new();
    ledger
        .submit(|l| {
            l.put_state(
                "m1",
                br#"{"docType":"marble","name":"m1","color":"blue","size":35,"owner":"tom","note":"keep"}"#.to_vec(),
            )
        })
        .unwrap();

    ledger.submit(|l| transfer(l, "m1", "jerry")).unwrap();

    assert_eq!(
        read(&ledger, "m1").unwrap(),
        br#"{"docType":"marble","name":"m1","color":"blue","size":35,"owner":"jerry","note":"keep"}"#.to_vec()
    );
}

#[test]
fn delete_needs_only_the_indexed_color() {
    let mut ledger = MemoryLedger::new();
    ledger
        .submit(|l| {
            let key = build_index_key(l, "blue", "m2")?;
            l.put_state("m2", br#"{"name":"m2","color":"blue"}"#.to_vec())?;
            index::insert(l, &key)
        })
        .unwrap();

    ledger.submit(|l| delete(l, "m2")).unwrap();

    assert!(ledger.get_state("m2").unwrap().is_none());
    assert!(names_for_color(&ledger, "blue").unwrap().is_empty());
}

#[test]
fn create_with_reserved_color_stages_no_write() {
    let mut ledger = MemoryLedger::new();
    let marble = Marble::new("m1", "bl\u{0}ue", 1, "tom");

    let err = ledger
        .submit(|l| {
            let err = create(l, &marble).unwrap_err();
            assert_eq!(l.pending_writes(), 0);

            Err::<(), _>(err)
        })
        .unwrap_err();

    assert_eq!(err.origin, ErrorOrigin::Index);
    assert!(ledger.is_empty());
}
