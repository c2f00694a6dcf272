//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod batch;
mod generate;
mod platforms;
mod status;

pub use batch::BatchArgs;
pub use generate::GenerateArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List ad platforms, recommended first
    Platforms,
    /// Generate one advertisement and wait for its image
    Generate(GenerateArgs),
    /// Generate a batch of ad variants and wait for all of them
    Batch(BatchArgs),
    /// Show the current status of a render job
    Status {
        /// Job identifier returned at submission
        uid: String,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Platforms => platforms::list_platforms(),
        Commands::Generate(args) => generate::generate(args, config).await,
        Commands::Batch(args) => batch::run_batch(args, config).await,
        Commands::Status { uid, json } => status::show_status(&uid, json, config).await,
    }
}

/// Cancels `token` when the user presses Ctrl-C
fn cancel_on_ctrl_c(token: adforge_poller::CancelToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, stopping");
            token.cancel();
        }
    })
}
