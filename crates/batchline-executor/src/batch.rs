//! The in-memory buffer of pending operations

use batchline_core::Operation;

/// Ordered operations waiting to be flushed
#[derive(Debug, Clone, Default)]
pub struct Batch {
    operations: Vec<Operation>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Pending operations in insertion order
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub(crate) fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Remove and return every pending operation, leaving the batch empty
    pub(crate) fn take(&mut self) -> Vec<Operation> {
        std::mem::take(&mut self.operations)
    }
}
