use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// The Chronos URI could not be parsed
    #[error("Invalid Chronos URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },
    /// HTTP request error (transport, TLS, timeout)
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),
    /// Upstream answered with something other than 200 OK
    #[error("Unexpected response from {url}: HTTP {status}")]
    UnexpectedStatus { url: String, status: StatusCode },
    /// Upstream payload is not the expected JSON document
    #[error("Invalid metrics payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    /// Metric construction or encoding error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
    /// Internal server error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::HttpRequest(_) | Self::UnexpectedStatus { .. } | Self::InvalidPayload(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::ConfigError(_) => "config_error",
        AppError::InvalidUri { .. } => "invalid_uri",
        AppError::HttpRequest(_) => "http_request_error",
        AppError::UnexpectedStatus { .. } => "unexpected_status",
        AppError::InvalidPayload(_) => "invalid_payload",
        AppError::Metrics(_) => "metrics_error",
        AppError::InternalError(_) => "internal_error",
    }
}
