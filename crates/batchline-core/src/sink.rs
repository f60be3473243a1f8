//! The statement sink contract
//!
//! A statement sink is the database client the batch executor submits work
//! to. The executor borrows a sink for the duration of each call; it never
//! owns one.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{BatchError, Operation, Outcome, Result};

#[cfg(test)]
mod tests;

/// Sink-issued identity of a prepared template
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateHandle {
    id: Uuid,
    sql: String,
}

impl TemplateHandle {
    /// Create a fresh handle for `sql`
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sql: sql.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// What a sink reports back for one batch submission
#[derive(Debug)]
pub struct SinkResponse {
    /// Outcomes in submission order. May be shorter than the submitted
    /// operations when the sink stopped early.
    pub outcomes: Vec<Outcome>,
    /// Set when the sink lost its connection part way through. Operations
    /// without an outcome were not attempted.
    pub interruption: Option<BatchError>,
}

impl SinkResponse {
    /// A submission the sink saw through to the end
    pub fn completed(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes,
            interruption: None,
        }
    }

    /// A submission cut short by a sink-level failure
    pub fn interrupted(outcomes: Vec<Outcome>, error: BatchError) -> Self {
        Self {
            outcomes,
            interruption: Some(error),
        }
    }
}

/// A database client able to execute prepared operations in batches
#[async_trait]
pub trait StatementSink: Send + Sync {
    /// Sink identifier used in logs (e.g. "sqlite")
    fn name(&self) -> &str;

    /// Prepare a statement template.
    ///
    /// Fails with [`BatchError::Prepare`] if the SQL is not valid for the
    /// target schema.
    async fn prepare(&self, sql: &str) -> Result<TemplateHandle>;

    /// Execute `operations` against the prepared template, in order.
    ///
    /// With `halt_on_first_error` the sink stops after the first failing
    /// operation; otherwise every operation is attempted.
    async fn execute_batch(
        &self,
        handle: &TemplateHandle,
        operations: &[Operation],
        halt_on_first_error: bool,
    ) -> Result<SinkResponse>;

    /// Release sink-side resources for the template. Idempotent.
    async fn close(&self, handle: &TemplateHandle) -> Result<()>;
}
