//! Configuration module
//!
//! Layers command-line flags over the poller's environment configuration.

use std::time::Duration;

use adforge_poller::{JobPoller, PollerConfig, WatchOptions};
use anyhow::Result;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub poller: PollerConfig,
}

impl Config {
    /// Builds the configuration from parsed flags
    ///
    /// Settings without a flag (batch cap, request timeout) keep their
    /// environment or default values.
    pub fn from_cli(
        service_url: String,
        interval_ms: u64,
        max_attempts: Option<u32>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let mut poller = PollerConfig::from_env();
        poller.service_url = service_url;
        poller.poll_interval = Duration::from_millis(interval_ms);
        poller.max_attempts = max_attempts;
        poller.watch_timeout = timeout_secs.map(Duration::from_secs);
        poller.validate()?;

        Ok(Self { poller })
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions::from(&self.poller)
    }

    pub fn job_poller(&self) -> Result<JobPoller> {
        JobPoller::from_config(&self.poller)
    }
}
