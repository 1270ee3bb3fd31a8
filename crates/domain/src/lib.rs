//! Domain layer for the counter point-of-sale system.
//!
//! This crate provides:
//! - `OrderBuilder`, the in-progress order checked against stock on every add
//! - `CommitProtocol`, which validates, takes stock and writes the ledger record
//! - `OrderDesk`, the session object owning every store and the current order

pub mod desk;
pub mod error;
pub mod order;

pub use desk::{MenuEntry, OrderDesk};
pub use error::DomainError;
pub use order::{
    CommitProtocol, CommitReceipt, CommitState, OrderBuilder, OrderError, OrderSnapshot,
    PriceLookup, StockLevels,
};
