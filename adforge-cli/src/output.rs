//! Terminal output helpers

use adforge_core::domain::job::{Job, JobSnapshot, JobStatus};
use colored::*;

/// Colorize job status for display
pub fn colorize_status(status: JobStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        JobStatus::Pending => status_str.yellow(),
        JobStatus::Completed => status_str.green(),
        JobStatus::Failed => status_str.red(),
    }
}

/// Print one line of watch progress
pub fn print_progress(snapshot: &JobSnapshot) {
    println!(
        "  {} Job {} attempt {}: {}",
        "▸".cyan(),
        snapshot.job.id().to_string().dimmed(),
        snapshot.attempt,
        colorize_status(snapshot.job.status())
    );
}

/// Print a job summary
pub fn print_job(job: &Job) {
    println!("  {} Job {}", "▸".cyan(), job.id().to_string().dimmed());
    println!("    Status: {}", colorize_status(job.status()));
    if let Some(url) = job.result_url() {
        println!("    Image:  {}", url.underline());
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
