//! Twinverse CLI
//!
//! Command-line front end for the Twinverse creation pipeline: phrase in,
//! published page out, with live status while each stage renders.

mod commands;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{Commands, handle_command};
use twinverse_pipeline::Config;

#[derive(Parser)]
#[command(name = "twinverse")]
#[command(about = "Twinverse creation pipeline CLI", long_about = None)]
struct Cli {
    /// Backend API URL (overrides TWINVERSE_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Seconds between status queries (overrides POLL_INTERVAL)
    #[arg(long)]
    poll_interval: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "twinverse=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(secs) = cli.poll_interval {
        config.poll_interval = Duration::from_secs(secs);
    }
    config.validate()?;

    handle_command(cli.command, &config).await
}
