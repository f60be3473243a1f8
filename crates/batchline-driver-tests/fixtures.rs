//! Test fixtures for running batch scenarios against a SQLite sink.
//!
//! Every test gets a fresh database seeded with a `user` table holding ids
//! `0..SEEDED_USERS`, so update and delete scenarios have rows to hit.
//!
//! # Usage
//!
//! ```rust,ignore
//! use batchline_driver_tests::fixtures::{TestStore, test_sink};
//! use rstest::rstest;
//!
//! #[rstest]
//! #[case::memory(TestStore::Memory)]
//! #[case::file(TestStore::File)]
//! #[tokio::test]
//! async fn test_something(#[case] store: TestStore) -> anyhow::Result<()> {
//!     let sink = test_sink(store)?;
//!     // test code...
//!     Ok(())
//! }
//! ```

use anyhow::{Context, Result};
use batchline_core::Value;
use batchline_driver_sqlite::SqliteSink;
use tempfile::TempDir;

/// Number of rows seeded into the `user` table
pub const SEEDED_USERS: i64 = 100;

/// Where the test database lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestStore {
    /// Private in-memory database
    Memory,
    /// Database file in a temporary directory
    File,
}

impl TestStore {
    /// Name used in log output
    pub fn name(&self) -> &'static str {
        match self {
            TestStore::Memory => "memory",
            TestStore::File => "file",
        }
    }
}

/// A seeded sink plus whatever keeps its storage alive
pub struct TestSink {
    sink: SqliteSink,
    _dir: Option<TempDir>,
}

impl std::ops::Deref for TestSink {
    type Target = SqliteSink;

    fn deref(&self) -> &Self::Target {
        &self.sink
    }
}

impl TestSink {
    /// The sink as a plain reference, for passing to the executor
    pub fn sink(&self) -> &SqliteSink {
        &self.sink
    }

    /// Count rows in `user` matching a WHERE clause
    pub fn count_users(&self, where_clause: &str) -> Result<i64> {
        let sql = format!("select count(*) from user where {}", where_clause);
        let rows = self.sink.query_rows(&sql, &[])?;
        rows.first()
            .and_then(|row| row.first())
            .and_then(Value::as_i64)
            .context("count query returned no rows")
    }

    /// Name stored for a user id, if the row exists
    pub fn user_name(&self, id: i64) -> Result<Option<String>> {
        let rows = self
            .sink
            .query_rows("select name from user where id = ?", &[Value::from(id)])?;
        Ok(rows
            .first()
            .and_then(|row| row.first())
            .and_then(|v| v.as_str().map(str::to_string)))
    }
}

/// Create a fresh sink seeded with the `user` table
pub fn test_sink(store: TestStore) -> Result<TestSink> {
    initialize_logging();

    let (sink, dir) = match store {
        TestStore::Memory => (SqliteSink::open_in_memory()?, None),
        TestStore::File => {
            let dir = tempfile::tempdir().context("failed to create temp dir")?;
            let path = dir.path().join("batchline.db");
            let path = path.to_str().context("temp path is not UTF-8")?.to_string();
            (SqliteSink::open(&path)?, Some(dir))
        }
    };

    let mut script = String::from(
        "CREATE TABLE user (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);\nBEGIN;\n",
    );
    for id in 0..SEEDED_USERS {
        script.push_str(&format!(
            "INSERT INTO user (id, name) VALUES ({}, 'user{}');\n",
            id, id
        ));
    }
    script.push_str("COMMIT;");
    sink.execute_script(&script)
        .context("failed to seed user table")?;

    tracing::debug!(store = store.name(), users = SEEDED_USERS, "test sink ready");
    Ok(TestSink { sink, _dir: dir })
}

/// Initialize logging for tests if not already initialized
///
/// This sets up tracing with appropriate filters for test output.
fn initialize_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("batchline=debug")),
            )
            .with_test_writer()
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
