//! In-progress order and commit endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{CommittedOrder, OrderLine, TIMESTAMP_FORMAT};
use domain::OrderSnapshot;
use serde::{Deserialize, Serialize};
use store::RecordStore;

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub name: String,
    pub quantity: i64,
}

#[derive(Deserialize)]
pub struct CommitRequest {
    #[serde(default)]
    pub customer_name: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderLineResponse {
    pub item_name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub unit_price_cents: i64,
    pub line_total: String,
    pub line_total_cents: i64,
}

impl From<&OrderLine> for OrderLineResponse {
    fn from(line: &OrderLine) -> Self {
        let line_total = line.line_total();
        Self {
            item_name: line.item_name.to_string(),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            unit_price_cents: line.unit_price.cents(),
            line_total: line_total.to_string(),
            line_total_cents: line_total.cents(),
        }
    }
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub lines: Vec<OrderLineResponse>,
    pub total: String,
    pub total_cents: i64,
}

impl From<OrderSnapshot> for OrderResponse {
    fn from(snapshot: OrderSnapshot) -> Self {
        Self {
            lines: snapshot.lines.iter().map(OrderLineResponse::from).collect(),
            total: snapshot.total.to_string(),
            total_cents: snapshot.total.cents(),
        }
    }
}

#[derive(Serialize)]
pub struct CommittedOrderResponse {
    pub id: String,
    pub timestamp: String,
    pub customer_name: String,
    pub lines: Vec<OrderLineResponse>,
    pub total: String,
    pub total_cents: i64,
    pub status: String,
}

impl From<&CommittedOrder> for CommittedOrderResponse {
    fn from(order: &CommittedOrder) -> Self {
        Self {
            id: order.id.to_string(),
            timestamp: order.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            customer_name: order.customer_name.clone(),
            lines: order.lines.iter().map(OrderLineResponse::from).collect(),
            total: order.total.to_string(),
            total_cents: order.total.cents(),
            status: order.status.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct CommitResponse {
    pub order_id: String,
    pub total: String,
    pub total_cents: i64,
    pub order: CommittedOrderResponse,
}

// -- Handlers --

/// GET /order: the in-progress order.
pub async fn current<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
) -> Json<OrderResponse> {
    Json(state.desk.lock().await.current_order().into())
}

/// POST /order/items: add units of a catalog item.
#[tracing::instrument(skip(state, req), fields(name = %req.name, quantity = req.quantity))]
pub async fn add_item<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let snapshot = state.desk.lock().await.add_item(&req.name, req.quantity)?;
    Ok(Json(snapshot.into()))
}

/// DELETE /order/items/{name}: drop a line; unknown names are ignored.
pub async fn remove_item<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
    Path(name): Path<String>,
) -> Json<OrderResponse> {
    Json(state.desk.lock().await.remove_item(&name).into())
}

/// DELETE /order: empty the in-progress order.
pub async fn clear<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
) -> StatusCode {
    state.desk.lock().await.clear_order();
    StatusCode::NO_CONTENT
}

/// POST /order/commit: commit the in-progress order for a customer.
#[tracing::instrument(skip(state, req))]
pub async fn commit<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
    Json(req): Json<CommitRequest>,
) -> Result<(StatusCode, Json<CommitResponse>), ApiError> {
    let mut desk = state.desk.lock().await;
    let receipt = desk.commit(&req.customer_name)?;

    // Fed while the desk is still locked so views see orders in ledger order.
    if let Err(e) = state.processor.process_order(&receipt.order) {
        tracing::warn!(order_id = %receipt.order_id, error = %e, "read model update failed");
    }
    drop(desk);

    let response = CommitResponse {
        order_id: receipt.order_id.to_string(),
        total: receipt.total.to_string(),
        total_cents: receipt.total.cents(),
        order: CommittedOrderResponse::from(&receipt.order),
    };
    Ok((StatusCode::CREATED, Json(response)))
}
