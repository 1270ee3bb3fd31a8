//! Projection error types.

use thiserror::Error;

/// Errors that can occur during projection processing.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The ledger could not be read.
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    /// The session could not replay its ledger.
    #[error("Domain error: {0}")]
    Domain(#[from] domain::DomainError),

    /// A projection-specific error.
    #[error("Projection error: {0}")]
    Projection(String),
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
