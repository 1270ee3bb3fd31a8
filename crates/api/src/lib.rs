//! Local HTTP API with observability for the counter point-of-sale system.
//!
//! Exposes the order desk (menu, stock, in-progress order, commit, ledger and
//! sales reports) as JSON endpoints, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use domain::OrderDesk;
use metrics_exporter_prometheus::PrometheusHandle;
use store::RecordStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<B: RecordStore + 'static>(
    state: Arc<AppState<B>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<B>))
        .route(
            "/menu",
            get(routes::catalog::list::<B>).post(routes::catalog::register::<B>),
        )
        .route(
            "/inventory/{name}",
            get(routes::catalog::stock::<B>).put(routes::catalog::restock::<B>),
        )
        .route(
            "/order",
            get(routes::order::current::<B>).delete(routes::order::clear::<B>),
        )
        .route("/order/items", post(routes::order::add_item::<B>))
        .route("/order/items/{name}", delete(routes::order::remove_item::<B>))
        .route("/order/commit", post(routes::order::commit::<B>))
        .route("/ledger", get(routes::ledger::replay::<B>))
        .route("/ledger/recent", get(routes::ledger::recent::<B>))
        .route("/ledger/{id}", get(routes::ledger::get::<B>))
        .route(
            "/customers/{name}/orders",
            get(routes::ledger::by_customer::<B>),
        )
        .route("/reports/sales", get(routes::reports::sales::<B>))
        .route("/reports/daily", get(routes::reports::daily::<B>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wraps an opened desk in shared state, replaying the ledger into the read models.
pub fn create_state<B: RecordStore + 'static>(
    desk: OrderDesk<B>,
) -> projections::Result<Arc<AppState<B>>> {
    Ok(Arc::new(AppState::new(desk)?))
}
