//! Single advertisement generation
//!
//! Submits one creative for a platform and follows the render job until
//! the image is ready.

use adforge_core::domain::job::{Job, JobStatus};
use adforge_core::domain::platform::Platform;
use adforge_core::dto::job::CreativeRequest;
use adforge_poller::{CancelToken, WatchError};
use anyhow::{Result, bail};
use clap::Args;
use colored::*;

use crate::config::Config;
use crate::output::{print_job, print_json, print_progress};

#[derive(Args)]
pub struct GenerateArgs {
    /// Target platform (google, whatsapp, twitter, reddit)
    #[arg(short, long)]
    platform: Platform,

    /// Background image URL, instead of the platform preset
    #[arg(long)]
    background_image: Option<String>,

    /// Title text, instead of the platform preset
    #[arg(long)]
    title: Option<String>,

    /// Print the final job as JSON
    #[arg(long)]
    json: bool,
}

impl GenerateArgs {
    fn request(&self) -> CreativeRequest {
        let mut creative = self.platform.default_creative();
        if let Some(background) = &self.background_image {
            creative.background_image = Some(background.clone());
        }
        if let Some(title) = &self.title {
            creative.title_text = Some(title.clone());
        }
        CreativeRequest::Creative(creative)
    }
}

pub async fn generate(args: GenerateArgs, config: &Config) -> Result<()> {
    let poller = config.job_poller()?;

    let handle = match poller.submit(&args.request()).await {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!(
                "{} {}",
                "Error generating advertisement.".red(),
                "Please try again.".yellow()
            );
            bail!(e);
        }
    };

    if !args.json {
        println!(
            "{}",
            format!("Generating {} advertisement ({})", args.platform, handle.id()).bold()
        );
    }

    let cancel = CancelToken::new();
    let interrupt = super::cancel_on_ctrl_c(cancel.clone());
    let json = args.json;
    let result = poller
        .watch_with_cancel(
            &handle,
            |snapshot| {
                if !json {
                    print_progress(snapshot);
                }
            },
            config.watch_options(),
            &cancel,
        )
        .await;
    interrupt.abort();

    match result {
        Ok(outcome) if json => {
            print_json(&outcome.job)?;
            ensure_generated(&outcome.job)
        }
        Ok(outcome) => {
            println!();
            match outcome.job.result_url() {
                Some(_) => println!("{}", "Generated Advertisement".green().bold()),
                None => println!("{}", "Generation failed".red().bold()),
            }
            print_job(&outcome.job);
            ensure_generated(&outcome.job)
        }
        Err(WatchError::Cancelled { .. }) => {
            println!("{}", "Cancelled.".yellow());
            Ok(())
        }
        Err(e) => bail!(e),
    }
}

/// Fails unless the job produced an image
fn ensure_generated(job: &Job) -> Result<()> {
    if job.status() != JobStatus::Completed {
        bail!("job {} ended {}", job.id(), job.status());
    }
    Ok(())
}
