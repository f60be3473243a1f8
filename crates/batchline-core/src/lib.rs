//! batchline core - shared types and the statement sink contract
//!
//! This crate provides the types every other batchline crate depends on:
//!
//! - `StatementSink` - Trait for the database client batches are submitted to
//! - `Operation`, `Outcome` - A bound statement instance and what happened to it
//! - `Value`, `ParamType` - Parameter values and their type families
//! - `BatchError` - The crate-wide error type

mod error;
mod operation;
mod placeholder;
mod sink;
mod types;

pub use error::*;
pub use operation::*;
pub use placeholder::*;
pub use sink::*;
pub use types::*;
