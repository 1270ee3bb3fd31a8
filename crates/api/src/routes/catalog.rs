//! Menu and stock endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::Money;
use domain::MenuEntry;
use serde::{Deserialize, Serialize};
use store::RecordStore;

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct RegisterItemRequest {
    pub name: String,
    /// Decimal price such as `"45.50"`.
    pub unit_price: String,
    pub stock: i64,
}

#[derive(Deserialize)]
pub struct RestockRequest {
    pub quantity: i64,
}

// -- Response types --

#[derive(Serialize)]
pub struct MenuItemResponse {
    pub name: String,
    pub unit_price: String,
    pub unit_price_cents: i64,
    pub stock: u32,
}

impl From<&MenuEntry> for MenuItemResponse {
    fn from(entry: &MenuEntry) -> Self {
        Self {
            name: entry.name.to_string(),
            unit_price: entry.unit_price.to_string(),
            unit_price_cents: entry.unit_price.cents(),
            stock: entry.stock,
        }
    }
}

#[derive(Serialize)]
pub struct StockResponse {
    pub name: String,
    pub quantity: u32,
}

// -- Handlers --

/// GET /menu: every catalog item with its stock, in catalog order.
pub async fn list<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
) -> Json<Vec<MenuItemResponse>> {
    let desk = state.desk.lock().await;
    Json(desk.menu().iter().map(MenuItemResponse::from).collect())
}

/// POST /menu: add an item or overwrite its price and stock.
#[tracing::instrument(skip(state, req), fields(name = %req.name))]
pub async fn register<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
    Json(req): Json<RegisterItemRequest>,
) -> Result<(StatusCode, Json<MenuItemResponse>), ApiError> {
    let unit_price: Money = req
        .unit_price
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid unit_price: {e}")))?;

    let entry = state
        .desk
        .lock()
        .await
        .register_item(&req.name, unit_price, req.stock)?;

    Ok((StatusCode::CREATED, Json(MenuItemResponse::from(&entry))))
}

/// GET /inventory/{name}: units on hand, 0 for unknown items.
pub async fn stock<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
    Path(name): Path<String>,
) -> Json<StockResponse> {
    let quantity = state.desk.lock().await.stock_of(&name);
    Json(StockResponse { name, quantity })
}

/// PUT /inventory/{name}: overwrite the stock level of a catalog item.
#[tracing::instrument(skip(state, req))]
pub async fn restock<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
    Path(name): Path<String>,
    Json(req): Json<RestockRequest>,
) -> Result<Json<StockResponse>, ApiError> {
    let quantity = state.desk.lock().await.restock(&name, req.quantity)?;
    Ok(Json(StockResponse { name, quantity }))
}
