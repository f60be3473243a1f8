//! Error types for batchline

use thiserror::Error;

/// Core error type for batch operations
#[derive(Error, Debug)]
pub enum BatchError {
    /// An operation's parameters disagree with the template it was added to.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The sink refused to prepare a template.
    #[error("Prepare error: {0}")]
    Prepare(String),

    /// A single operation failed while the batch was being executed.
    #[error("Operation failure: {0}")]
    OperationFailure(String),

    /// Connectivity or transport failure while talking to the sink.
    #[error("Sink unavailable: {0}")]
    SinkUnavailable(String),

    /// The template handle was already released at the sink.
    #[error("Template closed: {0}")]
    Closed(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BatchError {
    /// Whether this error describes the sink being unreachable rather than
    /// a problem with the submitted work.
    pub fn is_sink_unavailable(&self) -> bool {
        matches!(self, BatchError::SinkUnavailable(_))
    }
}

/// Result type alias for batch operations
pub type Result<T> = std::result::Result<T, BatchError>;
