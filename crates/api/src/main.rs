//! API server entry point.

use api::config::Config;
use domain::OrderDesk;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

fn describe_metrics() {
    metrics::describe_counter!("orders_committed_total", "Orders appended to the ledger");
    metrics::describe_counter!(
        "orders_rejected_total",
        "Commit attempts that failed, labelled by reason"
    );
    metrics::describe_counter!(
        "order_revenue_cents_total",
        metrics::Unit::Count,
        "Committed order revenue in cents"
    );
    metrics::describe_histogram!(
        "order_commit_duration_seconds",
        metrics::Unit::Seconds,
        "Time spent validating, decrementing stock and appending one order"
    );
    metrics::describe_counter!(
        "projections_orders_processed",
        "Committed orders folded into the read models"
    );
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");
    describe_metrics();

    // 3. Seed missing store files and open the desk
    let paths = config.store_paths();
    store::ensure_defaults(&paths).expect("failed to create store files");
    let desk = OrderDesk::open_files(&paths).expect("failed to open stores");

    // 4. Replay the ledger into the read models
    let state = api::create_state(desk).expect("ledger replay failed");

    // 5. Build the application
    let app = api::create_app(state, metrics_handle);

    // 6. Start server
    let addr = config.addr();
    tracing::info!(%addr, data_dir = %config.data_dir.display(), "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
