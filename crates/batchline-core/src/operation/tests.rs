//! Tests for operations and outcomes

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_operation_accessors() {
    let template_id = Uuid::new_v4();
    let op = Operation::new(template_id, vec![Value::from("batchUpdate0"), Value::from(0i64)]);

    assert_eq!(op.template_id(), template_id);
    assert_eq!(op.arity(), 2);
    assert_eq!(op.params()[0], Value::String("batchUpdate0".into()));
    assert_eq!(op.into_params().len(), 2);
}

#[test]
fn test_operation_error_display() {
    assert_eq!(OperationError::new("boom").to_string(), "boom");
    assert_eq!(
        OperationError::new("UNIQUE constraint failed").with_code("2067").to_string(),
        "[2067] UNIQUE constraint failed"
    );
}

#[test]
fn test_operation_error_from_batch_error() {
    let err: OperationError = BatchError::OperationFailure("duplicate key".into()).into();
    assert_eq!(err.message, "Operation failure: duplicate key");
    assert!(err.code.is_none());
}

#[test]
fn test_outcome_predicates() {
    let ok = Outcome::RowCount(3);
    let failed = Outcome::Failed(OperationError::new("nope"));
    let skipped = Outcome::NotAttempted;

    assert!(ok.is_success() && !ok.is_failed() && !ok.is_not_attempted());
    assert!(failed.is_failed() && !failed.is_success());
    assert!(skipped.is_not_attempted());

    assert_eq!(ok.row_count(), Some(3));
    assert_eq!(failed.row_count(), None);
    assert_eq!(failed.error().map(|e| e.message.as_str()), Some("nope"));
}

#[test]
fn test_outcome_display() {
    assert_eq!(Outcome::RowCount(1).to_string(), "1 row(s)");
    assert_eq!(Outcome::NotAttempted.to_string(), "not attempted");
    assert_eq!(
        Outcome::Failed(OperationError::new("x").with_code("E1")).to_string(),
        "failed: [E1] x"
    );
}

#[test]
fn test_outcome_serialization() {
    let outcomes = vec![
        Outcome::RowCount(1),
        Outcome::Failed(OperationError::new("bad").with_code("E001")),
        Outcome::NotAttempted,
    ];

    let json = serde_json::to_string(&outcomes).unwrap();
    let back: Vec<Outcome> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, outcomes);
}
