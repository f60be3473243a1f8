//! Tests for the sink contract types

use super::*;

#[test]
fn test_template_handle_ids_are_unique() {
    let a = TemplateHandle::new("delete from user where id=?");
    let b = TemplateHandle::new("delete from user where id=?");

    assert_eq!(a.sql(), b.sql());
    assert_ne!(a.id(), b.id());
    assert_ne!(a, b);
}

#[test]
fn test_sink_response_completed() {
    let response = SinkResponse::completed(vec![Outcome::RowCount(1), Outcome::RowCount(0)]);

    assert_eq!(response.outcomes.len(), 2);
    assert!(response.interruption.is_none());
}

#[test]
fn test_sink_response_interrupted() {
    let response = SinkResponse::interrupted(
        vec![Outcome::RowCount(1)],
        BatchError::SinkUnavailable("connection reset".into()),
    );

    assert_eq!(response.outcomes.len(), 1);
    assert!(
        response
            .interruption
            .as_ref()
            .is_some_and(|e| e.is_sink_unavailable())
    );
}
