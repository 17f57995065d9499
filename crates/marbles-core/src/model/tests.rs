use super::*;
use crate::error::ErrorClass;

#[test]
fn parse_case_folds_color_and_owner() {
    let marble = Marble::parse("marble1", "Blue", "35", "TOM").unwrap();

    assert_eq!(marble, Marble::new("marble1", "blue", 35, "tom"));
    assert_eq!(marble.doc_type, DOC_TYPE);
}

#[test]
fn parse_rejects_empty_fields_in_order() {
    let err = Marble::parse("", "", "35", "tom").unwrap_err();
    assert_eq!(err, ArgumentError::Empty { field: "name" });

    let err = Marble::parse("marble1", "blue", "35", "").unwrap_err();
    assert_eq!(err, ArgumentError::Empty { field: "owner" });
}

#[test]
fn parse_rejects_non_numeric_and_non_positive_size() {
    assert!(matches!(
        Marble::parse("m", "blue", "big", "tom").unwrap_err(),
        ArgumentError::NotInteger { field: "size", .. }
    ));
    assert_eq!(
        Marble::parse("m", "blue", "0", "tom").unwrap_err(),
        ArgumentError::NotPositive { field: "size" }
    );
    assert_eq!(
        Marble::parse("m", "blue", "-3", "tom").unwrap_err(),
        ArgumentError::NotPositive { field: "size" }
    );
}

#[test]
fn serialized_field_order_is_stable() {
    let marble = Marble::new("marble1", "blue", 35, "tom");
    let json = String::from_utf8(marble.to_bytes().unwrap()).unwrap();

    assert_eq!(
        json,
        r#"{"docType":"marble","name":"marble1","color":"blue","size":35,"owner":"tom"}"#
    );
}

#[test]
fn from_bytes_reports_decode_class() {
    let err = Marble::from_bytes("marble1", b"not json").unwrap_err();

    assert_eq!(err.class, ErrorClass::Decode);
    assert!(err.message.contains("marble1"));
}

#[test]
fn argument_errors_map_to_invalid_argument() {
    let err: InternalError = ArgumentError::Arity {
        operation: "readMarble",
        expected: 1,
        got: 0,
    }
    .into();

    assert_eq!(err.class, ErrorClass::InvalidArgument);
    assert!(err.message.contains("expecting 1"));
}

#[test]
fn record_transfer_keeps_unmodelled_fields_and_order() {
    let bytes = br#"{"docType":"marble","name":"m1","color":"blue","size":35,"owner":"tom","note":"keep","tag":null}"#;
    let mut record = MarbleRecord::from_bytes("m1", bytes).unwrap();

    record.set_owner("JERRY");

    assert_eq!(record.owner(), Some("jerry"));
    assert_eq!(
        String::from_utf8(record.to_bytes().unwrap()).unwrap(),
        r#"{"docType":"marble","name":"m1","color":"blue","size":35,"owner":"jerry","note":"keep","tag":null}"#
    );
}

#[test]
fn record_needs_only_color() {
    let record = MarbleRecord::from_bytes("m2", br#"{"name":"m2","color":"blue"}"#).unwrap();

    assert_eq!(record.color, "blue");
    assert_eq!(record.owner(), None);
    assert_eq!(record.to_bytes().unwrap(), br#"{"name":"m2","color":"blue"}"#.to_vec());
}

#[test]
fn record_without_color_or_not_an_object_is_decode_error() {
    for bytes in [&br#"{"name":"m3"}"#[..], b"[1,2]", b"{"] {
        let err = MarbleRecord::from_bytes("m3", bytes).unwrap_err();

        assert_eq!(err.class, ErrorClass::Decode);
    }
}
