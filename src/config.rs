use std::time::Duration;
use url::Url;

use crate::cli::Cli;
use crate::error::AppError;

/// Environment variable consulted when no bearer token flag is given
pub const BEARER_TOKEN_ENV: &str = "CHRONOS_AUTH_BEARER_TOKEN";

/// Immutable runtime settings, resolved once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub target: TargetConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `host:port`; hostnames are resolved when the listener binds
    pub listen_address: String,
    pub metrics_path: String,
}

/// Everything the upstream client needs to reach Chronos
#[derive(Clone)]
pub struct TargetConfig {
    pub uri: Url,
    pub timeout: Duration,
    pub verify_tls: bool,
    pub auth_bearer_token: Option<String>,
}

// Keeps the token out of debug logs.
impl std::fmt::Debug for TargetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetConfig")
            .field("uri", &self.uri.as_str())
            .field("timeout", &self.timeout)
            .field("verify_tls", &self.verify_tls)
            .field(
                "auth_bearer_token",
                &self.auth_bearer_token.as_ref().map(|_| "***"),
            )
            .finish()
    }
}

impl Settings {
    /// Build settings from parsed flags and the process environment
    pub fn from_cli(cli: Cli) -> Result<Self, AppError> {
        let env_token = std::env::var(BEARER_TOKEN_ENV).ok();
        Self::from_parts(cli, env_token)
    }

    /// Same as [`Settings::from_cli`] with the environment token passed explicitly
    pub fn from_parts(cli: Cli, env_token: Option<String>) -> Result<Self, AppError> {
        let uri = parse_chronos_uri(&cli.chronos_uri)?;
        let listen_address = parse_listen_address(&cli.listen_address)?;

        if !cli.metrics_path.starts_with('/') || cli.metrics_path == "/" {
            return Err(AppError::ConfigError(format!(
                "Telemetry path must start with '/' and must not be the root path: '{}'",
                cli.metrics_path
            )));
        }

        if cli.chronos_timeout.is_zero() {
            return Err(AppError::ConfigError(
                "Chronos timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            server: ServerConfig {
                listen_address,
                metrics_path: cli.metrics_path,
            },
            target: TargetConfig {
                uri,
                timeout: cli.chronos_timeout,
                verify_tls: cli.chronos_verify_tls,
                auth_bearer_token: resolve_bearer_token(&cli.chronos_auth_bearer_token, env_token),
            },
        })
    }
}

/// Parse and validate the Chronos base URI
pub fn parse_chronos_uri(raw: &str) -> Result<Url, AppError> {
    let uri = Url::parse(raw).map_err(|source| AppError::InvalidUri {
        uri: raw.to_string(),
        source,
    })?;

    match uri.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::ConfigError(format!(
                "Unsupported Chronos URI scheme '{}', expected http or https",
                other
            )))
        }
    }

    if uri.host_str().is_none() {
        return Err(AppError::ConfigError(format!(
            "Chronos URI '{}' has no host",
            raw
        )));
    }

    Ok(uri)
}

/// Normalize a listen address, accepting the `:port` shorthand for all interfaces
///
/// Hostnames are kept as given and resolved by the listener at bind time.
pub fn parse_listen_address(raw: &str) -> Result<String, AppError> {
    let candidate = if raw.starts_with(':') {
        format!("0.0.0.0{}", raw)
    } else {
        raw.to_string()
    };

    let port = candidate
        .rsplit_once(':')
        .filter(|(host, _)| !host.is_empty())
        .map(|(_, port)| port)
        .ok_or_else(|| {
            AppError::ConfigError(format!("Invalid listen address '{}': expected host:port", raw))
        })?;

    port.parse::<u16>().map_err(|e| {
        AppError::ConfigError(format!("Invalid listen address '{}': bad port: {}", raw, e))
    })?;

    Ok(candidate)
}

/// The flag wins; the environment is only consulted when the flag is empty
pub fn resolve_bearer_token(flag: &str, env: Option<String>) -> Option<String> {
    if !flag.is_empty() {
        return Some(flag.to_string());
    }

    match env {
        Some(token) if !token.is_empty() => {
            tracing::debug!("Auth bearer token found in {}, using that", BEARER_TOKEN_ENV);
            Some(token)
        }
        _ => None,
    }
}
