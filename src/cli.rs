use clap::{ArgAction, Parser, ValueEnum};
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "chronos-exporter", version, about = "Prometheus exporter for Chronos")]
pub struct Cli {
    /// Address to listen on for web interface and telemetry
    #[arg(long = "web.listen-address", default_value = ":9044")]
    pub listen_address: String,

    /// Path under which to expose metrics
    #[arg(long = "web.telemetry-path", default_value = "/metrics")]
    pub metrics_path: String,

    /// URI of Chronos
    #[arg(long = "chronos.uri", default_value = "http://chronos.mesos:4400")]
    pub chronos_uri: String,

    /// Timeout allowed for a Chronos scrape (also the connect retry interval)
    #[arg(long = "chronos.timeout", default_value = "10s", value_parser = humantime::parse_duration)]
    pub chronos_timeout: Duration,

    /// Verify the chronos.uri TLS certificate. Insecure if disabled
    #[arg(
        long = "chronos.verify-tls",
        default_value_t = true,
        action = ArgAction::Set,
        value_name = "BOOL"
    )]
    pub chronos_verify_tls: bool,

    /// Send an Authorization Bearer header to chronos.uri if given.
    /// It's more secure to set this via the CHRONOS_AUTH_BEARER_TOKEN environment variable
    #[arg(long = "chronos.auth-bearer-token", default_value = "", hide_default_value = true)]
    pub chronos_auth_bearer_token: String,

    /// Log filter directive (RUST_LOG takes precedence when set)
    #[arg(long = "log.level", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long = "log.format", value_enum, default_value_t = LogFormat::Logfmt)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable key=value lines
    Logfmt,
    /// One JSON object per line
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["chronos-exporter"]).unwrap();
        assert_eq!(cli.listen_address, ":9044");
        assert_eq!(cli.metrics_path, "/metrics");
        assert_eq!(cli.chronos_uri, "http://chronos.mesos:4400");
        assert_eq!(cli.chronos_timeout, Duration::from_secs(10));
        assert!(cli.chronos_verify_tls);
        assert!(cli.chronos_auth_bearer_token.is_empty());
        assert_eq!(cli.log_format, LogFormat::Logfmt);
    }

    #[test]
    fn test_cli_parsing_dotted_flags() {
        let cli = Cli::try_parse_from([
            "chronos-exporter",
            "--web.listen-address",
            "127.0.0.1:9100",
            "--chronos.uri=https://chronos.example:4443",
            "--chronos.timeout",
            "2s 500ms",
            "--chronos.verify-tls=false",
            "--chronos.auth-bearer-token",
            "secret",
            "--log.format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.listen_address, "127.0.0.1:9100");
        assert_eq!(cli.chronos_uri, "https://chronos.example:4443");
        assert_eq!(cli.chronos_timeout, Duration::from_millis(2500));
        assert!(!cli.chronos_verify_tls);
        assert_eq!(cli.chronos_auth_bearer_token, "secret");
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_cli_rejects_bad_timeout() {
        let result = Cli::try_parse_from(["chronos-exporter", "--chronos.timeout", "soon"]);
        assert!(result.is_err());
    }
}
