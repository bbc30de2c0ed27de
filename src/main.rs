use anyhow::{Context, Result};
use clap::Parser;

use chronos_exporter::{cli::Cli, config::Settings, init_tracing, server};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Before settings, so token resolution is logged
    init_tracing(&args.log_level, args.log_format);

    let settings = Settings::from_cli(args).context("Invalid configuration")?;

    // Blocks until Chronos is reachable, then serves until shutdown
    server::start_server(settings).await?;

    Ok(())
}
