//! Job status lookup

use adforge_core::domain::job::JobId;
use adforge_poller::JobHandle;
use anyhow::Result;

use crate::config::Config;
use crate::output::{print_job, print_json};

pub async fn show_status(uid: &str, json: bool, config: &Config) -> Result<()> {
    let poller = config.job_poller()?;
    let snapshot = poller.poll(&JobHandle::new(JobId::new(uid))).await?;

    if json {
        return print_json(&snapshot);
    }

    print_job(&snapshot.job);
    println!(
        "    Seen:   {}",
        snapshot.observed_at.format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}
