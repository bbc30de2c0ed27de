//! HTTP client for the Chronos scheduler
//!
//! Exposes the two calls the exporter needs: a liveness probe against
//! `/ping` and a raw fetch of `/metrics`. Retries are left to the caller.

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::{config::TargetConfig, error::AppError};

const PING_PATH: &str = "ping";
const METRICS_PATH: &str = "metrics";

/// The upstream service being exported
#[async_trait]
pub trait Upstream: Send + Sync + 'static {
    /// Succeeds only when the liveness endpoint answers 200 OK
    async fn probe(&self) -> Result<(), AppError>;

    /// Fetch the complete metrics payload
    async fn fetch(&self) -> Result<Bytes, AppError>;
}

/// Chronos upstream client
///
/// Configuration is fixed at construction. A fresh connection pool is built
/// per request, so concurrent scrapes share nothing but the read-only config.
#[derive(Debug, Clone)]
pub struct ChronosClient {
    target: TargetConfig,
}

impl ChronosClient {
    pub fn new(target: TargetConfig) -> Self {
        if !target.verify_tls {
            warn!(
                uri = %target.uri,
                "TLS certificate verification is disabled; the Chronos endpoint is not authenticated"
            );
        }
        Self { target }
    }

    pub fn target(&self) -> &TargetConfig {
        &self.target
    }

    /// Resolve a sub-path against the base URI, keeping any path prefix
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.target.uri.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}/{}", base, path));
        url
    }

    fn http_client(&self) -> Result<Client, AppError> {
        let client = Client::builder()
            .timeout(self.target.timeout)
            .connect_timeout(self.target.timeout)
            .danger_accept_invalid_certs(!self.target.verify_tls)
            .build()?;
        Ok(client)
    }

    async fn get(&self, path: &str) -> Result<Response, AppError> {
        let url = self.endpoint(path);
        let mut request = self.http_client()?.get(url);

        if let Some(token) = &self.target.auth_bearer_token {
            request = request.bearer_auth(token);
        }

        Ok(request.send().await?)
    }
}

#[async_trait]
impl Upstream for ChronosClient {
    async fn probe(&self) -> Result<(), AppError> {
        let response = match self.get(PING_PATH).await {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "Problem connecting to Chronos");
                return Err(e);
            }
        };

        if response.status() != StatusCode::OK {
            let err = AppError::UnexpectedStatus {
                url: response.url().to_string(),
                status: response.status(),
            };
            debug!(error = %err, "Problem reading Chronos ping response");
            return Err(err);
        }

        debug!("Connected to Chronos");
        Ok(())
    }

    async fn fetch(&self) -> Result<Bytes, AppError> {
        let response = self.get(METRICS_PATH).await?;

        if response.status() != StatusCode::OK {
            return Err(AppError::UnexpectedStatus {
                url: response.url().to_string(),
                status: response.status(),
            });
        }

        // Drain the whole body before handing it on; a read error discards it
        let body = response.bytes().await?;
        Ok(body)
    }
}
