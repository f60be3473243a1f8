//! SQLite-backed statement sink

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use batchline_core::{
    BatchError, Operation, OperationError, Outcome, Result, SinkResponse, StatementSink,
    TemplateHandle, Value, count_placeholders,
};
use parking_lot::Mutex;
use rusqlite::{Connection as RusqliteConnection, OpenFlags, params_from_iter};
use uuid::Uuid;

use crate::convert::{value_from_ref, values_to_rusqlite};

#[cfg(test)]
mod tests;

/// Statement sink executing batches against a SQLite database.
///
/// Templates are compiled once per handle through rusqlite's statement
/// cache. After [`shutdown`](Self::shutdown) every call reports
/// `SinkUnavailable`.
pub struct SqliteSink {
    conn: Arc<Mutex<Option<RusqliteConnection>>>,
    templates: Mutex<HashMap<Uuid, String>>,
}

impl SqliteSink {
    /// Open (or create) a SQLite database file
    pub fn open(path: &str) -> Result<Self> {
        tracing::info!(path = %path, "opening SQLite sink");
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = RusqliteConnection::open_with_flags(path, flags).map_err(|e| {
            BatchError::SinkUnavailable(format!(
                "Failed to open SQLite database at '{}': {}",
                path, e
            ))
        })?;
        Self::configure(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = RusqliteConnection::open_in_memory().map_err(|e| {
            BatchError::SinkUnavailable(format!("Failed to open in-memory database: {}", e))
        })?;
        Self::configure(conn)
    }

    fn configure(conn: RusqliteConnection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON").map_err(|e| {
            BatchError::SinkUnavailable(format!("Failed to enable foreign keys: {}", e))
        })?;

        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            templates: Mutex::new(HashMap::new()),
        })
    }

    /// Run one or more semicolon-separated statements, e.g. schema setup
    pub fn execute_script(&self, sql: &str) -> Result<()> {
        let guard = self.conn.lock();
        let conn = connection(&guard)?;
        conn.execute_batch(sql)
            .map_err(|e| BatchError::OperationFailure(format!("Failed to run script: {}", e)))
    }

    /// Run a query and return every row as values
    pub fn query_rows(&self, sql: &str, params: &[Value]) -> Result<Vec<Vec<Value>>> {
        let guard = self.conn.lock();
        let conn = connection(&guard)?;

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| BatchError::Prepare(format!("Failed to prepare query: {}", e)))?;
        let column_count = stmt.column_count();
        let mut rows = stmt
            .query(params_from_iter(values_to_rusqlite(params)))
            .map_err(|e| BatchError::OperationFailure(format!("Failed to execute query: {}", e)))?;

        let mut result = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| BatchError::OperationFailure(format!("Failed to fetch row: {}", e)))?
        {
            let mut values = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                let value_ref = row
                    .get_ref(idx)
                    .map_err(|e| BatchError::OperationFailure(e.to_string()))?;
                values.push(value_from_ref(value_ref));
            }
            result.push(values);
        }
        Ok(result)
    }

    /// Drop the underlying connection. Later calls fail with `SinkUnavailable`.
    pub fn shutdown(&self) {
        if self.conn.lock().take().is_some() {
            tracing::info!("SQLite sink shut down");
        }
        self.templates.lock().clear();
    }

    /// Whether `handle` is currently prepared on this sink
    pub fn is_prepared(&self, handle: &TemplateHandle) -> bool {
        self.templates.lock().contains_key(&handle.id())
    }
}

fn connection(conn: &Option<RusqliteConnection>) -> Result<&RusqliteConnection> {
    conn.as_ref()
        .ok_or_else(|| BatchError::SinkUnavailable("SQLite connection is closed".into()))
}

fn operation_error(err: rusqlite::Error) -> OperationError {
    let code = match &err {
        rusqlite::Error::SqliteFailure(failure, _) => Some(failure.extended_code.to_string()),
        _ => None,
    };
    let error = OperationError::new(err.to_string());
    match code {
        Some(code) => error.with_code(code),
        None => error,
    }
}

#[async_trait]
impl StatementSink for SqliteSink {
    fn name(&self) -> &str {
        "sqlite"
    }

    #[tracing::instrument(skip(self, sql), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn prepare(&self, sql: &str) -> Result<TemplateHandle> {
        let guard = self.conn.lock();
        let conn = connection(&guard)?;

        let stmt = conn
            .prepare_cached(sql)
            .map_err(|e| BatchError::Prepare(format!("Failed to prepare statement: {}", e)))?;

        // Operations bind positionally, one value per `?`
        let expected = count_placeholders(sql);
        if stmt.parameter_count() != expected {
            return Err(BatchError::Prepare(format!(
                "statement binds {} parameter(s) but has {} positional placeholder(s)",
                stmt.parameter_count(),
                expected
            )));
        }
        drop(stmt);

        let handle = TemplateHandle::new(sql);
        self.templates
            .lock()
            .insert(handle.id(), handle.sql().to_string());
        tracing::debug!(template = %handle.id(), "template prepared");
        Ok(handle)
    }

    #[tracing::instrument(skip(self, handle, operations), fields(template = %handle.id(), operations = operations.len()))]
    async fn execute_batch(
        &self,
        handle: &TemplateHandle,
        operations: &[Operation],
        halt_on_first_error: bool,
    ) -> Result<SinkResponse> {
        let guard = self.conn.lock();
        let conn = connection(&guard)?;

        let sql = self
            .templates
            .lock()
            .get(&handle.id())
            .cloned()
            .ok_or_else(|| BatchError::Closed(handle.sql().to_string()))?;

        let mut outcomes = Vec::with_capacity(operations.len());
        for operation in operations {
            let executed = conn.prepare_cached(&sql).and_then(|mut stmt| {
                stmt.execute(params_from_iter(values_to_rusqlite(operation.params())))
            });

            match executed {
                Ok(rows) => outcomes.push(Outcome::RowCount(rows as u64)),
                Err(e) => {
                    let error = operation_error(e);
                    tracing::debug!(index = outcomes.len(), error = %error, "operation failed");
                    outcomes.push(Outcome::Failed(error));
                    if halt_on_first_error {
                        break;
                    }
                }
            }
        }

        Ok(SinkResponse::completed(outcomes))
    }

    async fn close(&self, handle: &TemplateHandle) -> Result<()> {
        if self.templates.lock().remove(&handle.id()).is_some() {
            tracing::debug!(template = %handle.id(), "template released");
        }
        Ok(())
    }
}
