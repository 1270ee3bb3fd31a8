//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use store::RecordStore;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub orders_committed: usize,
    pub next_order_id: String,
}

/// GET /health: reports liveness and where order numbering stands.
pub async fn check<B: RecordStore + 'static>(
    State(state): State<Arc<AppState<B>>>,
) -> Json<HealthResponse> {
    let desk = state.desk.lock().await;
    Json(HealthResponse {
        status: "ok",
        orders_committed: desk.committed_count(),
        next_order_id: desk.next_order_id().to_string(),
    })
}
