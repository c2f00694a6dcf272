//! Batch generation
//!
//! Requests a set of ad variants in one submission and follows every
//! render job concurrently.

use adforge_core::dto::job::CreativeRequest;
use adforge_poller::CancelToken;
use anyhow::{Result, bail};
use clap::Args;
use colored::*;

use crate::config::Config;
use crate::output::{colorize_status, print_job, print_json};

#[derive(Args)]
pub struct BatchArgs {
    /// Maximum number of variants to track
    #[arg(long)]
    cap: Option<usize>,

    /// Print the tracked jobs as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run_batch(args: BatchArgs, config: &Config) -> Result<()> {
    let poller = config.job_poller()?;
    let cap = args.cap.unwrap_or(config.poller.batch_cap);
    if cap == 0 {
        bail!("--cap must be greater than 0");
    }

    let cancel = CancelToken::new();
    let interrupt = super::cancel_on_ctrl_c(cancel.clone());
    let json = args.json;

    let result = poller
        .run_batch(
            &CreativeRequest::Batch,
            cap,
            config.watch_options(),
            &cancel,
            |job| {
                if !json {
                    println!(
                        "  {} Job {} is now {}",
                        "▸".cyan(),
                        job.id().to_string().dimmed(),
                        colorize_status(job.status())
                    );
                }
            },
        )
        .await;
    interrupt.abort();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!(
                "{} {}",
                "Error generating advertisements.".red(),
                "Please try again.".yellow()
            );
            bail!(e);
        }
    };

    if json {
        return print_json(&report.jobs);
    }

    println!();
    println!(
        "{}",
        format!(
            "Generated {} of {} advertisement(s):",
            report.completed().count(),
            report.jobs.len()
        )
        .bold()
    );
    for job in &report.jobs {
        print_job(job);
    }

    if !report.removed.is_empty() {
        println!();
        println!("{}", "Dropped:".yellow().bold());
        for error in &report.removed {
            println!("  {} {}", "✗".red(), error);
        }
    }

    if !report.timed_out.is_empty() {
        println!();
        println!(
            "{}",
            format!("{} job(s) still pending when polling stopped", report.timed_out.len()).yellow()
        );
    }

    Ok(())
}
