//! AdForge job poller
//!
//! Drives creative-generation jobs from submission to a terminal status.
//!
//! Architecture:
//! - [`JobPoller`]: submit, poll once, or watch a job until it completes
//! - [`task::poll_until`]: the fixed-interval, cancellable loop behind every watch
//! - [`BatchTracker`] / [`JobPoller::run_batch`]: several jobs watched concurrently
//! - [`PollerConfig`]: service URL and watch limits, from the environment
//!
//! The poller reaches the creative service through
//! [`adforge_client::JobService`], so any implementation can back it.

pub mod batch;
pub mod cancel;
pub mod config;
pub mod error;
pub mod poller;
pub mod task;

#[cfg(test)]
mod testing;

pub use batch::{BatchReport, BatchTracker};
pub use cancel::CancelToken;
pub use config::{PollerConfig, WatchOptions};
pub use error::{PollError, SubmissionError, WatchError};
pub use poller::{JobHandle, JobPoller, WatchOutcome, WatchTask};
