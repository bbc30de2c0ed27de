use std::time::Duration;
use tracing::{debug, info};

use crate::providers::Upstream;

/// An upstream whose liveness probe has succeeded at least once
///
/// Only [`wait_for_upstream`] hands these out, so holding one means the
/// exporter is past the initial connect phase.
#[derive(Debug)]
pub struct Connected<U> {
    upstream: U,
    attempts: u32,
}

impl<U> Connected<U> {
    /// Number of probes it took to reach the upstream (1 = first try)
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn into_inner(self) -> U {
        self.upstream
    }
}

/// Probe the upstream until it answers, sleeping `interval` between attempts
///
/// This never gives up; the process is expected to be terminated externally
/// if the upstream never comes up.
pub async fn wait_for_upstream<U: Upstream>(upstream: U, interval: Duration) -> Connected<U> {
    let mut attempts = 0;

    loop {
        attempts += 1;
        match upstream.probe().await {
            Ok(()) => {
                crate::metrics::record_probe("success");
                info!(attempts, "Connected to Chronos");
                return Connected { upstream, attempts };
            }
            Err(e) => {
                crate::metrics::record_probe("failure");
                debug!(error = %e, attempts, "Problem connecting to Chronos");
                info!(
                    "Couldn't connect to Chronos! Trying again in {}",
                    humantime::format_duration(interval)
                );
                tokio::time::sleep(interval).await;
            }
        }
    }
}
