use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use metrics_exporter_prometheus::PrometheusHandle;
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::Arc;

use crate::error::AppError;

/// Shared state for the telemetry endpoint
#[derive(Clone)]
pub struct MetricsState {
    /// Registry holding the Chronos collector
    pub registry: Registry,
    /// The exporter's own instrumentation, if a recorder is installed
    pub self_metrics: Option<Arc<PrometheusHandle>>,
}

/// Handle the telemetry endpoint: one Chronos scrape per request
pub async fn metrics(State(state): State<MetricsState>) -> Result<impl IntoResponse, AppError> {
    let registry = state.registry.clone();

    // Collectors block on the upstream call, keep them off the async workers
    let families = tokio::task::spawn_blocking(move || registry.gather())
        .await
        .map_err(|e| AppError::InternalError(format!("Metrics collection task failed: {}", e)))?;

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&families, &mut buffer)?;

    let mut body = String::from_utf8(buffer)
        .map_err(|e| AppError::InternalError(format!("Encoded metrics are not UTF-8: {}", e)))?;

    if let Some(handle) = &state.self_metrics {
        body.push_str(&handle.render());
    }

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        body,
    ))
}
