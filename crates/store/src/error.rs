use std::path::PathBuf;

use common::{ItemName, OrderId};
use thiserror::Error;

/// Errors that can occur when reading from or writing to a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing medium refused the operation.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// A decrement asked for more units than are on hand.
    #[error("Insufficient stock for {item}: requested {requested}, available {available}")]
    InsufficientStock {
        item: ItemName,
        available: u32,
        requested: u32,
    },

    /// A ledger append would break the strictly increasing id sequence.
    #[error("Order {id} is not newer than the last committed order {last}")]
    OutOfSequence { id: OrderId, last: OrderId },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true when the failure came from the backing medium rather
    /// than from a business rule.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, StoreError::Io { .. } | StoreError::Unavailable(_))
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
