//! HTTP route handlers.

pub mod catalog;
pub mod health;
pub mod ledger;
pub mod metrics;
pub mod order;
pub mod reports;
