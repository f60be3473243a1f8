//! Operations and their per-flush outcomes

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BatchError, Value};

#[cfg(test)]
mod tests;

/// One parameterized statement instance.
///
/// Immutable once built: the template it belongs to and its ordered
/// parameter values can be read but not changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    template_id: Uuid,
    params: Vec<Value>,
}

impl Operation {
    /// Create an operation for the template identified by `template_id`
    pub fn new(template_id: Uuid, params: Vec<Value>) -> Self {
        Self {
            template_id,
            params,
        }
    }

    /// Identifier of the template this operation binds to
    pub fn template_id(&self) -> Uuid {
        self.template_id
    }

    /// Bound parameter values, in placeholder order
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Number of bound parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Consume the operation, returning its parameters
    pub fn into_params(self) -> Vec<Value> {
        self.params
    }
}

/// Error information for a failed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    /// Error message
    pub message: String,
    /// Error code (if available from database)
    pub code: Option<String>,
}

impl OperationError {
    /// Create a new operation error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// Attach a database error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl From<BatchError> for OperationError {
    fn from(err: BatchError) -> Self {
        Self::new(err.to_string())
    }
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(code) = &self.code {
            write!(f, "[{}] {}", code, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for OperationError {}

/// What happened to a single operation during a flush
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Executed; the sink reported this many affected rows
    RowCount(u64),
    /// Executed and failed
    Failed(OperationError),
    /// Never reached the database
    NotAttempted,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::RowCount(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn is_not_attempted(&self) -> bool {
        matches!(self, Outcome::NotAttempted)
    }

    /// Affected rows, if the operation succeeded
    pub fn row_count(&self) -> Option<u64> {
        match self {
            Outcome::RowCount(n) => Some(*n),
            _ => None,
        }
    }

    /// Failure details, if the operation failed
    pub fn error(&self) -> Option<&OperationError> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::RowCount(n) => write!(f, "{} row(s)", n),
            Outcome::Failed(err) => write!(f, "failed: {}", err),
            Outcome::NotAttempted => write!(f, "not attempted"),
        }
    }
}
