//! Prometheus collector backed by live Chronos scrapes
//!
//! Every `collect` call performs one fetch against Chronos and translates the
//! payload from scratch. Nothing is carried over between scrapes.

use prometheus::{
    core::{Collector, Desc},
    proto::MetricFamily,
};
use std::time::Instant;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::{
    converters::chronos_to_prometheus,
    error::AppError,
    models::chronos::MetricsPayload,
    providers::Upstream,
    retry::Connected,
};

pub struct ChronosExporter<U> {
    upstream: U,
    descs: Vec<Desc>,
    runtime: Handle,
}

impl<U: Upstream> ChronosExporter<U> {
    /// Build the exporter for a reachable upstream
    ///
    /// `runtime` drives the HTTP calls made from the synchronous `collect`.
    pub fn new(connected: Connected<U>, runtime: Handle) -> Result<Self, AppError> {
        Ok(Self {
            upstream: connected.into_inner(),
            descs: chronos_to_prometheus::describe_catalog()?,
            runtime,
        })
    }

    /// Run one scrape cycle
    ///
    /// Failures are logged and yield an empty result.
    pub async fn scrape(&self) -> Vec<MetricFamily> {
        let start = Instant::now();

        match self.try_scrape().await {
            Ok(families) => {
                crate::metrics::record_scrape("success", start.elapsed());
                debug!(families = families.len(), "Scraped Chronos");
                families
            }
            Err(e) => {
                crate::metrics::record_scrape("error", start.elapsed());
                warn!(error = %e, "Failed to scrape Chronos");
                Vec::new()
            }
        }
    }

    async fn try_scrape(&self) -> Result<Vec<MetricFamily>, AppError> {
        let body = self.upstream.fetch().await?;
        let payload = MetricsPayload::from_slice(&body)?;
        debug!(
            bytes = body.len(),
            version = payload.version.as_deref().unwrap_or("unknown"),
            "Parsed Chronos metrics payload"
        );
        chronos_to_prometheus::convert(&payload)
    }
}

impl<U: Upstream> Collector for ChronosExporter<U> {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    /// Must not be called from an async context; the HTTP handler gathers
    /// on a blocking thread.
    fn collect(&self) -> Vec<MetricFamily> {
        self.runtime.block_on(self.scrape())
    }
}
