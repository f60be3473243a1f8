//! Batched statement execution
//!
//! This crate buffers parameterized write operations for a prepared template
//! and flushes them to a [`StatementSink`](batchline_core::StatementSink),
//! reporting one outcome per operation.
//!
//! ```ignore
//! use batchline_executor::{BatchExecutor, BatchOptions};
//!
//! let mut executor =
//!     BatchExecutor::prepare(&sink, "update user set name=? where id=?", BatchOptions::new())
//!         .await?;
//! for i in 0..100i64 {
//!     executor.add_params([Value::from(format!("batchUpdate{i}")), Value::from(i)])?;
//!     executor.flush_if_threshold(&sink, 10).await;
//! }
//! let last = executor.drain(&sink).await;
//! ```

mod batch;
mod executor;
mod options;
mod result;
mod stats;
mod template;

#[cfg(test)]
mod tests;

pub use batch::Batch;
pub use executor::{BatchExecutor, SessionState};
pub use options::{BatchOptions, FailurePolicy};
pub use result::{FlushEntry, FlushResult};
pub use stats::ExecutorStats;
pub use template::Template;
