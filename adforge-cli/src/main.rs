//! AdForge CLI
//!
//! Command-line front end for generating ad creative: pick a platform,
//! submit a render, and follow the job until the image is ready.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "adforge")]
#[command(about = "AdForge creative generation CLI", long_about = None)]
struct Cli {
    /// Creative service URL
    #[arg(long, env = "ADFORGE_SERVICE_URL", default_value = "http://localhost:3000")]
    service_url: String,

    /// Delay between two status queries, in milliseconds
    #[arg(long, env = "ADFORGE_POLL_INTERVAL_MS", default_value_t = 1000)]
    interval_ms: u64,

    /// Give up on a job after this many status queries
    #[arg(long, env = "ADFORGE_MAX_ATTEMPTS")]
    max_attempts: Option<u32>,

    /// Give up on a job after this many seconds
    #[arg(long, env = "ADFORGE_WATCH_TIMEOUT")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adforge_cli=info,adforge_poller=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_cli(
        cli.service_url,
        cli.interval_ms,
        cli.max_attempts,
        cli.timeout_secs,
    )?;

    handle_command(cli.command, &config).await
}
