//! Core projection trait and position tracking.

use common::CommittedOrder;

use crate::Result;

/// Tracks how many ledger records a projection has processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionPosition {
    /// Number of orders processed by this projection.
    pub orders_processed: u64,
}

impl ProjectionPosition {
    /// Creates a new position at zero.
    pub fn zero() -> Self {
        Self {
            orders_processed: 0,
        }
    }

    /// Advances the position by one order.
    pub fn advance(&self) -> Self {
        Self {
            orders_processed: self.orders_processed + 1,
        }
    }
}

impl std::fmt::Display for ProjectionPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "position({})", self.orders_processed)
    }
}

/// A projection that folds committed orders into a read model.
pub trait Projection: Send + Sync {
    /// Returns the name of this projection.
    fn name(&self) -> &'static str;

    /// Handles a single committed order.
    fn handle(&self, order: &CommittedOrder) -> Result<()>;

    /// Returns the current position of this projection.
    fn position(&self) -> ProjectionPosition;

    /// Resets the projection to its initial state.
    fn reset(&self) -> Result<()>;
}
