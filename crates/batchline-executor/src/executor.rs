//! Batch executor implementation
//!
//! Buffers operations for one prepared template and flushes them to a
//! statement sink, either on demand, when a size threshold is reached, or at
//! the end of a session.

use std::time::Instant;

use batchline_core::{Operation, ParamType, Result, StatementSink, Value};
use serde::{Deserialize, Serialize};

use crate::{Batch, BatchOptions, ExecutorStats, FlushResult, Template};

/// Lifecycle of the executor's current batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// Nothing buffered
    #[default]
    Idle,
    /// At least one operation buffered
    Accumulating,
    /// A flush is waiting on the sink
    Flushing,
}

/// Buffers parameterized operations and flushes them as a unit.
///
/// The executor owns its batch and template but never its sink: every call
/// that talks to the database borrows one. Mutating calls take `&mut self`,
/// so a single executor cannot be driven from two tasks at once; use one
/// executor per worker.
#[derive(Debug)]
pub struct BatchExecutor {
    template: Template,
    batch: Batch,
    options: BatchOptions,
    state: SessionState,
    stats: ExecutorStats,
}

impl BatchExecutor {
    /// Prepare `sql` on the sink and create an executor for it
    pub async fn prepare(
        sink: &dyn StatementSink,
        sql: &str,
        options: BatchOptions,
    ) -> Result<Self> {
        Self::prepare_inner(sink, sql, None, options).await
    }

    /// Like [`prepare`](Self::prepare), additionally enforcing a declared
    /// type for each placeholder
    pub async fn prepare_typed(
        sink: &dyn StatementSink,
        sql: &str,
        param_types: Vec<ParamType>,
        options: BatchOptions,
    ) -> Result<Self> {
        Self::prepare_inner(sink, sql, Some(param_types), options).await
    }

    async fn prepare_inner(
        sink: &dyn StatementSink,
        sql: &str,
        param_types: Option<Vec<ParamType>>,
        options: BatchOptions,
    ) -> Result<Self> {
        options.validate()?;

        let handle = sink.prepare(sql).await?;
        let template = match Template::new(handle.clone(), param_types) {
            Ok(template) => template,
            Err(err) => {
                if let Err(close_err) = sink.close(&handle).await {
                    tracing::warn!(error = %close_err, "failed to release rejected template");
                }
                return Err(err);
            }
        };

        tracing::debug!(
            sink = sink.name(),
            template = %template.id(),
            arity = template.arity(),
            policy = ?options.policy,
            "prepared batch template"
        );

        Ok(Self {
            template,
            batch: Batch::new(),
            options,
            state: SessionState::Idle,
            stats: ExecutorStats::default(),
        })
    }

    /// Append an operation to the current batch.
    ///
    /// Fails with `SchemaMismatch` if the operation does not match the
    /// template; the batch is left unchanged.
    pub fn add(&mut self, operation: Operation) -> Result<()> {
        self.recover_abandoned_flush();
        self.template.check(&operation)?;

        self.batch.push(operation);
        self.state = SessionState::Accumulating;
        tracing::trace!(pending = self.batch.len(), "operation buffered");
        Ok(())
    }

    /// Bind `params` to this executor's template and append the operation
    pub fn add_params<I, V>(&mut self, params: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let operation = self
            .template
            .bind(params.into_iter().map(Into::into).collect());
        self.add(operation)
    }

    /// Submit every buffered operation to the sink.
    ///
    /// The batch is empty when this returns, whatever the outcome. Sink-level
    /// failures are reported on the returned result, never retried.
    ///
    /// Operations stay buffered until the sink answers. If the returned
    /// future is dropped first they remain pending and go out with the next
    /// flush.
    pub async fn flush(&mut self, sink: &dyn StatementSink) -> FlushResult {
        self.recover_abandoned_flush();
        let policy = self.options.policy;

        if self.batch.is_empty() {
            tracing::trace!("flush of empty batch skipped");
            return FlushResult::empty(policy);
        }

        self.state = SessionState::Flushing;
        tracing::debug!(
            sink = sink.name(),
            template = %self.template.id(),
            operations = self.batch.len(),
            policy = ?policy,
            "flushing batch"
        );

        let start = Instant::now();
        let response = sink
            .execute_batch(
                self.template.handle(),
                self.batch.operations(),
                policy.halts_on_error(),
            )
            .await;
        let operations = self.batch.take();
        let result = FlushResult::from_response(operations, response, policy, start.elapsed());

        self.state = SessionState::Idle;
        self.stats.record(&result);

        if let Some(err) = result.sink_error() {
            tracing::warn!(
                sink = sink.name(),
                error = %err,
                not_attempted = result.not_attempted_count(),
                "flush interrupted by sink failure"
            );
        }
        tracing::debug!(
            succeeded = result.success_count(),
            failed = result.failure_count(),
            not_attempted = result.not_attempted_count(),
            elapsed_ms = result.elapsed().as_millis() as u64,
            "batch flushed"
        );

        result
    }

    /// Flush only if at least `max_size` operations are buffered
    pub async fn flush_if_threshold(
        &mut self,
        sink: &dyn StatementSink,
        max_size: usize,
    ) -> Option<FlushResult> {
        if self.batch.len() >= max_size {
            Some(self.flush(sink).await)
        } else {
            None
        }
    }

    /// Add an operation, then flush if the configured `max_batch_size` has
    /// been reached
    pub async fn push(
        &mut self,
        sink: &dyn StatementSink,
        operation: Operation,
    ) -> Result<Option<FlushResult>> {
        self.add(operation)?;
        match self.options.max_batch_size {
            Some(max) => Ok(self.flush_if_threshold(sink, max).await),
            None => Ok(None),
        }
    }

    /// Flush whatever is left. A no-op on an empty batch.
    pub async fn drain(&mut self, sink: &dyn StatementSink) -> FlushResult {
        self.flush(sink).await
    }

    /// Drain the batch and release the template on the sink.
    ///
    /// A failure to release the template is logged; it does not affect the
    /// returned outcomes.
    pub async fn finish(mut self, sink: &dyn StatementSink) -> FlushResult {
        let result = self.drain(sink).await;
        if let Err(err) = sink.close(self.template.handle()).await {
            tracing::warn!(
                sink = sink.name(),
                template = %self.template.id(),
                error = %err,
                "failed to release template"
            );
        }
        result
    }

    /// Number of buffered operations
    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Buffered operations in insertion order
    pub fn pending(&self) -> &[Operation] {
        self.batch.operations()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> &ExecutorStats {
        &self.stats
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    // A flush future dropped mid-await leaves the state at Flushing with its
    // operations still in the batch.
    fn recover_abandoned_flush(&mut self) {
        if self.state == SessionState::Flushing {
            tracing::warn!(
                template = %self.template.id(),
                pending = self.batch.len(),
                "previous flush was cancelled before the sink returned, operations kept for the next flush"
            );
            self.state = if self.batch.is_empty() {
                SessionState::Idle
            } else {
                SessionState::Accumulating
            };
        }
    }
}
