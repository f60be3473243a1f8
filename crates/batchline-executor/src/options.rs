//! Batch executor configuration

use std::path::Path;

use batchline_core::{BatchError, Result};
use serde::{Deserialize, Serialize};

/// What the sink does after an operation fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Attempt every operation; each outcome stands on its own
    #[default]
    ContinueOnError,
    /// Stop at the first failure; later operations are not attempted
    HaltOnFirstError,
}

impl FailurePolicy {
    pub fn halts_on_error(&self) -> bool {
        matches!(self, FailurePolicy::HaltOnFirstError)
    }
}

/// Configuration options for a batch executor
///
/// Loadable from TOML:
///
/// ```toml
/// policy = "halt_on_first_error"
/// max_batch_size = 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Failure policy applied to every flush
    pub policy: FailurePolicy,
    /// Size at which [`push`](crate::BatchExecutor::push) flushes automatically.
    /// `None` leaves flushing entirely to the caller.
    pub max_batch_size: Option<usize>,
}

impl BatchOptions {
    /// Create new batch options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that keep going past failed operations
    pub fn continue_on_error() -> Self {
        Self {
            policy: FailurePolicy::ContinueOnError,
            ..Self::default()
        }
    }

    /// Options that stop at the first failed operation
    pub fn halt_on_first_error() -> Self {
        Self {
            policy: FailurePolicy::HaltOnFirstError,
            ..Self::default()
        }
    }

    /// Set the failure policy
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the auto-flush size used by `push`.
    ///
    /// Zero is rejected by [`validate`](Self::validate).
    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = Some(max);
        self
    }

    /// Parse options from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let options: Self = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading batch options");
        Self::from_toml_str(&source)
    }

    /// Reject option combinations the executor cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.max_batch_size == Some(0) {
            return Err(BatchError::Configuration(
                "max_batch_size must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            policy: FailurePolicy::ContinueOnError,
            max_batch_size: None,
        }
    }
}
