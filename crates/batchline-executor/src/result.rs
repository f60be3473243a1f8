//! Per-flush outcome reporting

use std::time::Duration;

use batchline_core::{BatchError, Operation, Outcome, Result, SinkResponse};

use crate::FailurePolicy;

/// One submitted operation and what happened to it
#[derive(Debug, Clone, PartialEq)]
pub struct FlushEntry {
    /// Position of the operation within the flush (0-based)
    pub index: usize,
    pub operation: Operation,
    pub outcome: Outcome,
}

/// Result of a single flush.
///
/// Holds exactly one entry per flushed operation, in the order the operations
/// were added.
#[derive(Debug)]
pub struct FlushResult {
    entries: Vec<FlushEntry>,
    policy: FailurePolicy,
    sink_error: Option<BatchError>,
    elapsed: Duration,
    success_count: usize,
    failure_count: usize,
    not_attempted_count: usize,
}

impl FlushResult {
    /// Result of flushing an empty batch
    pub fn empty(policy: FailurePolicy) -> Self {
        Self::new(Vec::new(), policy, None, Duration::ZERO)
    }

    fn new(
        entries: Vec<FlushEntry>,
        policy: FailurePolicy,
        sink_error: Option<BatchError>,
        elapsed: Duration,
    ) -> Self {
        let success_count = entries.iter().filter(|e| e.outcome.is_success()).count();
        let failure_count = entries.iter().filter(|e| e.outcome.is_failed()).count();
        let not_attempted_count = entries
            .iter()
            .filter(|e| e.outcome.is_not_attempted())
            .count();

        Self {
            entries,
            policy,
            sink_error,
            elapsed,
            success_count,
            failure_count,
            not_attempted_count,
        }
    }

    /// Pair flushed operations with what the sink reported for them.
    ///
    /// The sink's report is normalised so the result always has one outcome
    /// per operation: missing outcomes become `NotAttempted`, surplus ones are
    /// dropped, and under [`FailurePolicy::HaltOnFirstError`] everything after
    /// the first failure is `NotAttempted`.
    pub(crate) fn from_response(
        operations: Vec<Operation>,
        response: Result<SinkResponse>,
        policy: FailurePolicy,
        elapsed: Duration,
    ) -> Self {
        let (outcomes, sink_error) = normalize_outcomes(operations.len(), response, policy);
        let entries = operations
            .into_iter()
            .zip(outcomes)
            .enumerate()
            .map(|(index, (operation, outcome))| FlushEntry {
                index,
                operation,
                outcome,
            })
            .collect();

        Self::new(entries, policy, sink_error, elapsed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FlushEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<FlushEntry> {
        self.entries
    }

    /// Outcomes in submission order
    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.entries.iter().map(|e| &e.outcome)
    }

    pub fn outcome(&self, index: usize) -> Option<&Outcome> {
        self.entries.get(index).map(|e| &e.outcome)
    }

    /// Policy the flush ran under
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Sink-level failure that cut the flush short, if any
    pub fn sink_error(&self) -> Option<&BatchError> {
        self.sink_error.as_ref()
    }

    pub fn is_interrupted(&self) -> bool {
        self.sink_error.is_some()
    }

    /// Time spent waiting on the sink
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    pub fn not_attempted_count(&self) -> usize {
        self.not_attempted_count
    }

    /// Check if every operation executed successfully
    pub fn all_succeeded(&self) -> bool {
        self.failure_count == 0 && self.not_attempted_count == 0 && self.sink_error.is_none()
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count > 0
    }

    /// Total rows affected across successful operations
    pub fn total_affected_rows(&self) -> u64 {
        self.outcomes().filter_map(Outcome::row_count).sum()
    }

    /// Operations that executed and failed
    pub fn failed_operations(&self) -> Vec<&Operation> {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_failed())
            .map(|e| &e.operation)
            .collect()
    }

    /// Operations a caller may resubmit: failed ones and ones never attempted
    pub fn retryable_operations(&self) -> Vec<Operation> {
        self.entries
            .iter()
            .filter(|e| !e.outcome.is_success())
            .map(|e| e.operation.clone())
            .collect()
    }
}

fn normalize_outcomes(
    expected: usize,
    response: Result<SinkResponse>,
    policy: FailurePolicy,
) -> (Vec<Outcome>, Option<BatchError>) {
    let response = match response {
        Ok(response) => response,
        Err(err) => {
            return (
                vec![Outcome::NotAttempted; expected],
                Some(as_sink_unavailable(err)),
            );
        }
    };

    let SinkResponse {
        mut outcomes,
        interruption,
    } = response;
    let interruption = interruption.map(as_sink_unavailable);

    if outcomes.len() > expected {
        tracing::warn!(
            expected,
            reported = outcomes.len(),
            "sink reported more outcomes than operations, dropping the surplus"
        );
        outcomes.truncate(expected);
    }

    if policy.halts_on_error()
        && let Some(first_failure) = outcomes.iter().position(Outcome::is_failed)
    {
        for outcome in outcomes.iter_mut().skip(first_failure + 1) {
            *outcome = Outcome::NotAttempted;
        }
    }

    let halted = policy.halts_on_error() && outcomes.iter().any(Outcome::is_failed);
    if outcomes.len() < expected && interruption.is_none() && !halted {
        tracing::warn!(
            expected,
            reported = outcomes.len(),
            "sink reported fewer outcomes than operations, marking the rest not attempted"
        );
    }
    outcomes.resize(expected, Outcome::NotAttempted);

    (outcomes, interruption)
}

// Flush-level failures are always reported as the sink being unavailable
fn as_sink_unavailable(err: BatchError) -> BatchError {
    match err {
        BatchError::SinkUnavailable(_) => err,
        other => BatchError::SinkUnavailable(other.to_string()),
    }
}
