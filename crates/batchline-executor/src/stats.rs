//! Cumulative executor statistics

use serde::{Deserialize, Serialize};

use crate::FlushResult;

/// Counters accumulated over every flush an executor has performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutorStats {
    /// Flushes that reached the sink (empty flushes are not counted)
    flushes: u64,
    /// Operations handed to the sink
    operations_submitted: u64,
    succeeded: u64,
    failed: u64,
    not_attempted: u64,
    rows_affected: u64,
    /// Flushes cut short by a sink-level failure
    interruptions: u64,
}

impl ExecutorStats {
    pub(crate) fn record(&mut self, result: &FlushResult) {
        if result.is_empty() {
            return;
        }
        self.flushes += 1;
        self.operations_submitted += result.len() as u64;
        self.succeeded += result.success_count() as u64;
        self.failed += result.failure_count() as u64;
        self.not_attempted += result.not_attempted_count() as u64;
        self.rows_affected += result.total_affected_rows();
        if result.is_interrupted() {
            self.interruptions += 1;
        }
    }

    pub fn flushes(&self) -> u64 {
        self.flushes
    }

    pub fn operations_submitted(&self) -> u64 {
        self.operations_submitted
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn not_attempted(&self) -> u64 {
        self.not_attempted
    }

    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    pub fn interruptions(&self) -> u64 {
        self.interruptions
    }

    /// Fraction of submitted operations that succeeded (0.0 to 1.0)
    ///
    /// Returns 0.0 before anything has been submitted.
    pub fn success_rate(&self) -> f64 {
        if self.operations_submitted == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.operations_submitted as f64
        }
    }
}
