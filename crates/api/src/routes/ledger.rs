//! Committed-order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::OrderId;
use serde::Deserialize;
use store::RecordStore;

use super::order::CommittedOrderResponse;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// GET /ledger: every committed order, read back from the ledger file.
#[tracing::instrument(skip(state))]
pub async fn replay<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
) -> Result<Json<Vec<CommittedOrderResponse>>, ApiError> {
    let orders = state.desk.lock().await.replay_ledger()?;
    Ok(Json(orders.iter().map(CommittedOrderResponse::from).collect()))
}

/// GET /ledger/recent?limit=N: newest orders first (default 10).
pub async fn recent<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
    Query(query): Query<RecentQuery>,
) -> Json<Vec<CommittedOrderResponse>> {
    let orders = state.history.get_recent(query.limit.unwrap_or(10));
    Json(orders.iter().map(CommittedOrderResponse::from).collect())
}

/// GET /ledger/{id}: one committed order.
pub async fn get<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
    Path(id): Path<String>,
) -> Result<Json<CommittedOrderResponse>, ApiError> {
    let order_id: OrderId = id
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid order id: {e}")))?;
    let order = state
        .history
        .get_order(order_id)
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;
    Ok(Json(CommittedOrderResponse::from(&order)))
}

/// GET /customers/{name}/orders: orders placed under a customer name.
pub async fn by_customer<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
    Path(name): Path<String>,
) -> Json<Vec<CommittedOrderResponse>> {
    let orders = state.history.get_history_by_customer(&name);
    Json(orders.iter().map(CommittedOrderResponse::from).collect())
}
