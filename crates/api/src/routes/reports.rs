//! Sales report endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use projections::{DailySales, ItemSales};
use serde::{Deserialize, Serialize};
use store::RecordStore;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct SalesQuery {
    /// Only report the best-selling `top` items.
    pub top: Option<usize>,
}

#[derive(Serialize)]
pub struct ItemSalesResponse {
    pub name: String,
    pub units: u64,
    pub revenue: String,
    pub revenue_cents: i64,
}

impl From<&ItemSales> for ItemSalesResponse {
    fn from(item: &ItemSales) -> Self {
        Self {
            name: item.name.to_string(),
            units: item.units,
            revenue: item.revenue.to_string(),
            revenue_cents: item.revenue.cents(),
        }
    }
}

#[derive(Serialize)]
pub struct SalesResponse {
    pub order_count: u64,
    pub units: u64,
    pub revenue: String,
    pub revenue_cents: i64,
    pub items: Vec<ItemSalesResponse>,
}

#[derive(Serialize)]
pub struct DailySalesResponse {
    pub date: String,
    pub order_count: u64,
    pub revenue: String,
    pub revenue_cents: i64,
}

impl From<&DailySales> for DailySalesResponse {
    fn from(day: &DailySales) -> Self {
        Self {
            date: day.date.format("%Y-%m-%d").to_string(),
            order_count: day.order_count,
            revenue: day.revenue.to_string(),
            revenue_cents: day.revenue.cents(),
        }
    }
}

/// GET /reports/sales?top=N: ledger-wide totals, items ranked by units.
pub async fn sales<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
    Query(query): Query<SalesQuery>,
) -> Json<SalesResponse> {
    let summary = state.sales.summary();
    let limit = query.top.unwrap_or(summary.items.len());
    Json(SalesResponse {
        order_count: summary.order_count,
        units: summary.units,
        revenue: summary.revenue.to_string(),
        revenue_cents: summary.revenue.cents(),
        items: summary
            .items
            .iter()
            .take(limit)
            .map(ItemSalesResponse::from)
            .collect(),
    })
}

/// GET /reports/daily: revenue per calendar day, oldest first.
pub async fn daily<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
) -> Json<Vec<DailySalesResponse>> {
    Json(state.sales.daily().iter().map(DailySalesResponse::from).collect())
}
