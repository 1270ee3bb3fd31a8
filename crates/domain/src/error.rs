//! Domain error types.

use store::StoreError;
use thiserror::Error;

use crate::order::OrderError;

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A business rule rejected the operation.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// A store could not be read or written.
    #[error("Persistence failure: {0}")]
    Persistence(StoreError),
}

impl DomainError {
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, DomainError::Persistence(_))
    }

    /// Short label used for the `reason` metric tag.
    pub fn reason(&self) -> &'static str {
        match self {
            DomainError::Order(e) => e.reason(),
            DomainError::Persistence(_) => "persistence",
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InsufficientStock {
                item,
                available,
                requested,
            } => DomainError::Order(OrderError::InsufficientStock {
                item: item.to_string(),
                available,
                requested,
            }),
            other => DomainError::Persistence(other),
        }
    }
}
