//! Read model views over the order ledger.

pub mod order_history;
pub mod sales;

pub use order_history::OrderHistoryView;
pub use sales::{DailySales, ItemSales, SalesSummary, SalesView};
