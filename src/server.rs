use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use prometheus::Registry;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::Settings,
    exporter::ChronosExporter,
    handlers::{self, metrics_handler::MetricsState},
    metrics,
    providers::{ChronosClient, Upstream},
    retry::{self, Connected},
    signals::setup_signal_handlers,
};

/// Start the exporter
///
/// This function:
/// 1. Waits until Chronos answers its liveness probe
/// 2. Registers the Chronos collector
/// 3. Binds the listener (failure is fatal)
/// 4. Serves requests until SIGTERM/SIGINT
pub async fn start_server(settings: Settings) -> Result<()> {
    info!("Initializing exporter metrics...");
    let metrics_handle = Arc::new(metrics::init_metrics()?);

    let client = ChronosClient::new(settings.target.clone());
    info!(chronos = ?client.target(), "Waiting for Chronos");
    let connected = retry::wait_for_upstream(client, settings.target.timeout).await;

    let registry = build_registry(connected)?;
    let app = create_router(&settings.server.metrics_path, registry, Some(metrics_handle));

    let (shutdown_tx, signal_handle) = setup_signal_handlers();
    let mut shutdown_rx = shutdown_tx.subscribe();

    info!("Starting Server: {}", settings.server.listen_address);
    let listener = tokio::net::TcpListener::bind(settings.server.listen_address.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", settings.server.listen_address))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Register the Chronos collector in a fresh registry
///
/// Must be called from within a tokio runtime.
pub fn build_registry<U: Upstream>(connected: Connected<U>) -> Result<Registry> {
    let exporter = ChronosExporter::new(connected, tokio::runtime::Handle::current())?;
    let registry = Registry::new();
    registry
        .register(Box::new(exporter))
        .context("Failed to register Chronos collector")?;
    Ok(registry)
}

/// Create the Axum router: landing page plus the telemetry path
pub fn create_router(
    metrics_path: &str,
    registry: Registry,
    self_metrics: Option<Arc<PrometheusHandle>>,
) -> Router {
    let landing = Router::new()
        .route("/", get(handlers::landing::landing_page))
        .with_state(Arc::<str>::from(metrics_path));

    let telemetry = Router::new()
        .route(metrics_path, get(handlers::metrics_handler::metrics))
        .with_state(MetricsState {
            registry,
            self_metrics,
        });

    Router::new()
        .merge(landing)
        .merge(telemetry)
        .layer(TraceLayer::new_for_http())
}
