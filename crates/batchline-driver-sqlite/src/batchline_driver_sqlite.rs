//! SQLite statement sink implementation

mod convert;
mod sink;

pub use sink::SqliteSink;
