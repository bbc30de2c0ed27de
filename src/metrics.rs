use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

use crate::error::AppError;

/// Install the recorder for the exporter's own instrumentation
pub fn init_metrics() -> Result<PrometheusHandle, AppError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AppError::InternalError(format!("Failed to install metrics recorder: {}", e)))?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "chronos_exporter_scrapes_total",
        "Chronos scrapes performed by the exporter, by result"
    );
    describe_histogram!(
        "chronos_exporter_scrape_duration_seconds",
        "Duration of Chronos scrapes in seconds"
    );
    describe_counter!(
        "chronos_exporter_probe_attempts_total",
        "Chronos liveness probes made while connecting, by result"
    );
    describe_gauge!(
        "chronos_exporter_build_info",
        "Exporter version information"
    );

    gauge!("chronos_exporter_build_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record the outcome of one scrape
pub fn record_scrape(result: &'static str, duration: Duration) {
    counter!("chronos_exporter_scrapes_total", "result" => result).increment(1);
    histogram!("chronos_exporter_scrape_duration_seconds").record(duration.as_secs_f64());
}

/// Record one startup probe
pub fn record_probe(result: &'static str) {
    counter!("chronos_exporter_probe_attempts_total", "result" => result).increment(1);
}
