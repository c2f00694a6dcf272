//! Poller configuration
//!
//! Connection settings for the creative service and the limits applied to
//! every watch loop.

use std::time::Duration;

/// Poller configuration
///
/// Intervals and limits are configurable so local runs against the stub
/// service can poll quickly while real deployments stay gentle.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Creative service base URL (e.g., "http://localhost:3000")
    pub service_url: String,

    /// Delay between two status queries of the same job
    pub poll_interval: Duration,

    /// Stop watching a job after this many status queries
    pub max_attempts: Option<u32>,

    /// Stop watching a job after this much time
    pub watch_timeout: Option<Duration>,

    /// Maximum number of jobs tracked from one batch submission
    pub batch_cap: usize,

    /// Timeout of a single HTTP request
    pub request_timeout: Duration,
}

impl PollerConfig {
    /// Creates a new configuration with defaults
    pub fn new(service_url: String) -> Self {
        Self {
            service_url,
            poll_interval: Duration::from_secs(1),
            max_attempts: None,
            watch_timeout: None,
            batch_cap: 3,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - ADFORGE_SERVICE_URL (optional, default: http://localhost:3000)
    /// - ADFORGE_POLL_INTERVAL_MS (optional, milliseconds, default: 1000)
    /// - ADFORGE_MAX_ATTEMPTS (optional, default: unlimited)
    /// - ADFORGE_WATCH_TIMEOUT (optional, seconds, default: unlimited)
    /// - ADFORGE_BATCH_CAP (optional, default: 3)
    /// - ADFORGE_REQUEST_TIMEOUT (optional, seconds, default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let service_url = std::env::var("ADFORGE_SERVICE_URL").unwrap_or(defaults.service_url);

        let poll_interval = std::env::var("ADFORGE_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);

        let max_attempts = std::env::var("ADFORGE_MAX_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok());

        let watch_timeout = std::env::var("ADFORGE_WATCH_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);

        let batch_cap = std::env::var("ADFORGE_BATCH_CAP")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.batch_cap);

        let request_timeout = std::env::var("ADFORGE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Self {
            service_url,
            poll_interval,
            max_attempts,
            watch_timeout,
            batch_cap,
            request_timeout,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.service_url.is_empty() {
            anyhow::bail!("service_url cannot be empty");
        }

        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            anyhow::bail!("service_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.max_attempts == Some(0) {
            anyhow::bail!("max_attempts must be greater than 0");
        }

        if self.batch_cap == 0 {
            anyhow::bail!("batch_cap must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000".to_string())
    }
}

/// Limits applied to one watch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
    pub timeout: Option<Duration>,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: None,
            timeout: None,
        }
    }
}

impl WatchOptions {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl From<&PollerConfig> for WatchOptions {
    fn from(config: &PollerConfig) -> Self {
        Self {
            interval: config.poll_interval,
            max_attempts: config.max_attempts,
            timeout: config.watch_timeout,
        }
    }
}
