//! Tests for the SQLite statement sink

use super::*;

const SCHEMA: &str = "CREATE TABLE user (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);";

fn sink_with_schema() -> SqliteSink {
    let sink = SqliteSink::open_in_memory().expect("open in-memory sink");
    sink.execute_script(SCHEMA).expect("create schema");
    sink
}

fn op(handle: &TemplateHandle, params: Vec<Value>) -> Operation {
    Operation::new(handle.id(), params)
}

#[tokio::test]
async fn test_prepare_valid_template() {
    let sink = sink_with_schema();

    let handle = sink
        .prepare("insert into user(name) values (?)")
        .await
        .expect("prepare");

    assert!(sink.is_prepared(&handle));
    assert_eq!(sink.name(), "sqlite");
}

#[tokio::test]
async fn test_prepare_unknown_table_fails() {
    let sink = sink_with_schema();

    let err = sink
        .prepare("update missing set name=? where id=?")
        .await
        .unwrap_err();

    assert!(matches!(err, BatchError::Prepare(_)));
}

#[tokio::test]
async fn test_prepare_rejects_named_parameters() {
    let sink = sink_with_schema();

    let err = sink
        .prepare("update user set name=:name where id=?")
        .await
        .unwrap_err();

    assert!(matches!(err, BatchError::Prepare(_)));
}

#[tokio::test]
async fn test_prepare_accepts_bracketed_identifiers() {
    let sink = sink_with_schema();
    sink.execute_script("CREATE TABLE odd (id INTEGER PRIMARY KEY, [a?b] TEXT);")
        .unwrap();

    let handle = sink
        .prepare("update odd set [a?b] = ? where id = ?")
        .await
        .expect("bracketed column is not a placeholder");

    assert!(sink.is_prepared(&handle));
}

#[tokio::test]
async fn test_execute_batch_reports_row_counts() {
    let sink = sink_with_schema();
    let handle = sink
        .prepare("insert into user(name) values (?)")
        .await
        .unwrap();
    let ops: Vec<_> = (0..3)
        .map(|i| op(&handle, vec![Value::from(format!("batchInsert{}", i))]))
        .collect();

    let response = sink.execute_batch(&handle, &ops, false).await.unwrap();

    assert_eq!(response.outcomes, vec![Outcome::RowCount(1); 3]);
    assert!(response.interruption.is_none());
    let rows = sink.query_rows("select count(*) from user", &[]).unwrap();
    assert_eq!(rows, vec![vec![Value::Int64(3)]]);
}

#[tokio::test]
async fn test_execute_batch_constraint_failure_continues() {
    let sink = sink_with_schema();
    let handle = sink
        .prepare("insert into user(name) values (?)")
        .await
        .unwrap();
    let ops = vec![
        op(&handle, vec![Value::from("a")]),
        op(&handle, vec![Value::from("a")]),
        op(&handle, vec![Value::from("b")]),
    ];

    let response = sink.execute_batch(&handle, &ops, false).await.unwrap();

    assert_eq!(response.outcomes.len(), 3);
    assert!(response.outcomes[0].is_success());
    let error = response.outcomes[1].error().expect("unique violation");
    assert!(error.message.contains("UNIQUE"));
    assert!(error.code.is_some());
    assert!(response.outcomes[2].is_success());
}

#[tokio::test]
async fn test_execute_batch_halts_on_first_error() {
    let sink = sink_with_schema();
    let handle = sink
        .prepare("insert into user(name) values (?)")
        .await
        .unwrap();
    let ops = vec![
        op(&handle, vec![Value::from("a")]),
        op(&handle, vec![Value::Null]),
        op(&handle, vec![Value::from("b")]),
    ];

    let response = sink.execute_batch(&handle, &ops, true).await.unwrap();

    assert_eq!(response.outcomes.len(), 2);
    assert!(response.outcomes[1].is_failed());
    let rows = sink.query_rows("select name from user", &[]).unwrap();
    assert_eq!(rows, vec![vec![Value::from("a")]]);
}

#[tokio::test]
async fn test_update_reports_zero_for_missing_rows() {
    let sink = sink_with_schema();
    sink.execute_script("insert into user(id, name) values (1, 'one');")
        .unwrap();
    let handle = sink
        .prepare("update user set name=? where id=?")
        .await
        .unwrap();
    let ops = vec![
        op(&handle, vec![Value::from("uno"), Value::from(1i64)]),
        op(&handle, vec![Value::from("dos"), Value::from(2i64)]),
    ];

    let response = sink.execute_batch(&handle, &ops, false).await.unwrap();

    assert_eq!(response.outcomes, vec![Outcome::RowCount(1), Outcome::RowCount(0)]);
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let sink = sink_with_schema();
    let handle = sink.prepare("delete from user where id=?").await.unwrap();

    sink.close(&handle).await.unwrap();
    sink.close(&handle).await.unwrap();

    assert!(!sink.is_prepared(&handle));
    let err = sink
        .execute_batch(&handle, &[op(&handle, vec![Value::from(1i64)])], false)
        .await
        .unwrap_err();
    assert!(matches!(err, BatchError::Closed(_)));
}

#[tokio::test]
async fn test_shutdown_makes_sink_unavailable() {
    let sink = sink_with_schema();
    let handle = sink.prepare("delete from user where id=?").await.unwrap();

    sink.shutdown();

    let err = sink
        .execute_batch(&handle, &[op(&handle, vec![Value::from(1i64)])], false)
        .await
        .unwrap_err();
    assert!(err.is_sink_unavailable());
    assert!(sink.prepare("delete from user where id=?").await.is_err());
}

#[tokio::test]
async fn test_open_file_database() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("batch.db");

    {
        let sink = SqliteSink::open(path.to_str().unwrap()).expect("open file sink");
        sink.execute_script(SCHEMA).unwrap();
        sink.execute_script("insert into user(name) values ('persisted');")
            .unwrap();
    }

    let reopened = SqliteSink::open(path.to_str().unwrap()).expect("reopen");
    let rows = reopened.query_rows("select name from user", &[]).unwrap();
    assert_eq!(rows, vec![vec![Value::from("persisted")]]);
}
