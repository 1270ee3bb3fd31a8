//! Read models rebuilt from the committed-order ledger.
//!
//! This crate provides the query side of the order desk:
//! - [`Projection`] trait for folding committed orders into read models
//! - [`ReadModel`] trait for query access to derived data
//! - [`ProjectionProcessor`] for feeding ledger records to projections
//! - Two views: order history and sales totals

pub mod error;
pub mod processor;
pub mod projection;
pub mod read_model;
pub mod source;
pub mod views;

pub use error::{ProjectionError, Result};
pub use processor::ProjectionProcessor;
pub use projection::{Projection, ProjectionPosition};
pub use read_model::ReadModel;
pub use source::OrderSource;
pub use views::{DailySales, ItemSales, OrderHistoryView, SalesSummary, SalesView};
