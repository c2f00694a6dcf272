//! Job poller
//!
//! Submits creation requests to the creative service and drives each
//! resulting job to a terminal status with a fixed-interval watch loop.
//! Every watch is independent: one loop per job, cancellable on its own.

use std::sync::Arc;

use adforge_client::{CreativeClient, JobService};
use adforge_core::domain::job::{Job, JobId, JobSnapshot};
use adforge_core::dto::job::CreativeRequest;
use anyhow::Context as _;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::config::{PollerConfig, WatchOptions};
use crate::error::{PollError, SubmissionError, WatchError};
use crate::task::{LoopExit, poll_until};

/// A submitted job, as returned by [`JobPoller::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    id: JobId,
    submitted_at: DateTime<Utc>,
}

impl JobHandle {
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            submitted_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// State of the job right after submission
    pub fn initial_job(&self) -> Job {
        Job::pending(self.id.clone())
    }
}

/// A watch that reached a terminal status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOutcome {
    pub job: Job,
    pub attempts: u32,
}

/// Submits jobs and watches them to completion
#[derive(Clone)]
pub struct JobPoller {
    service: Arc<dyn JobService>,
}

impl JobPoller {
    /// Creates a poller over any job service
    pub fn new(service: Arc<dyn JobService>) -> Self {
        Self { service }
    }

    /// Creates a poller talking HTTP to `config.service_url`
    pub fn from_config(config: &PollerConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let client = CreativeClient::with_client(config.service_url.clone(), http_client);
        Ok(Self::new(Arc::new(client)))
    }

    // =============================================================================
    // Submission
    // =============================================================================

    /// Submits a request and returns a handle for every identified job
    ///
    /// Descriptors without an identifier are skipped. Fails if none has one.
    pub async fn submit_batch(
        &self,
        request: &CreativeRequest,
    ) -> Result<Vec<JobHandle>, SubmissionError> {
        let descriptors = self.service.submit(request).await.map_err(|e| {
            warn!("Submission failed: {}", e);
            SubmissionError::from(e)
        })?;

        let received = descriptors.len();
        let handles: Vec<JobHandle> = descriptors
            .iter()
            .filter_map(|descriptor| descriptor.job_id())
            .map(JobHandle::new)
            .collect();

        if handles.is_empty() {
            warn!("Submission returned {} descriptor(s) but no job id", received);
            return Err(SubmissionError::MissingIdentifier);
        }

        if handles.len() < received {
            warn!(
                "Skipped {} descriptor(s) without a job id",
                received - handles.len()
            );
        }

        for handle in &handles {
            info!("Submitted job {}", handle.id());
        }

        Ok(handles)
    }

    /// Submits a request and returns the handle of the first job
    pub async fn submit(&self, request: &CreativeRequest) -> Result<JobHandle, SubmissionError> {
        let mut handles = self.submit_batch(request).await?;
        Ok(handles.swap_remove(0))
    }

    // =============================================================================
    // Polling
    // =============================================================================

    /// Queries the current status of a job once
    pub async fn poll(&self, handle: &JobHandle) -> Result<JobSnapshot, PollError> {
        self.poll_attempt(handle, 1).await
    }

    async fn poll_attempt(&self, handle: &JobHandle, attempt: u32) -> Result<JobSnapshot, PollError> {
        let id = handle.id();
        debug!("Polling job {} (attempt {})", id, attempt);

        let descriptor = self
            .service
            .status(id)
            .await
            .map_err(|e| PollError::from_client(id.clone(), e))?;

        if let Some(reported) = descriptor.job_id().filter(|reported| reported != id) {
            debug!("Status for job {} reported uid {}", id, reported);
        }

        Ok(JobSnapshot::new(descriptor.to_job(id.clone()), attempt))
    }

    /// Polls a job until it is terminal or `options` runs out
    ///
    /// `on_update` is called with every snapshot, the terminal one included.
    /// The loop stops at the first [`PollError`] without retrying.
    pub async fn watch<F>(
        &self,
        handle: &JobHandle,
        on_update: F,
        options: WatchOptions,
    ) -> Result<WatchOutcome, WatchError>
    where
        F: FnMut(&JobSnapshot),
    {
        self.watch_with_cancel(handle, on_update, options, &CancelToken::new())
            .await
    }

    /// Same as [`watch`](Self::watch), stopping early when `cancel` fires
    pub async fn watch_with_cancel<F>(
        &self,
        handle: &JobHandle,
        mut on_update: F,
        options: WatchOptions,
        cancel: &CancelToken,
    ) -> Result<WatchOutcome, WatchError>
    where
        F: FnMut(&JobSnapshot),
    {
        let id = handle.id().clone();
        let mut current = handle.initial_job();

        let exit = poll_until(
            move |attempt| self.poll_attempt(handle, attempt),
            |snapshot: &JobSnapshot| snapshot.job.is_terminal(),
            options,
            cancel,
            |snapshot| {
                current.merge(snapshot.job.clone());
                on_update(&JobSnapshot {
                    job: current.clone(),
                    ..snapshot.clone()
                });
            },
        )
        .await;

        match exit {
            LoopExit::Terminal { attempts, .. } => {
                info!(
                    "Job {} {} after {} attempt(s)",
                    id,
                    current.status(),
                    attempts
                );
                Ok(WatchOutcome {
                    job: current,
                    attempts,
                })
            }
            LoopExit::Failed { error, attempt } => {
                warn!("Stopped watching job {}: {}", id, error);
                Err(WatchError::Poll {
                    attempt,
                    source: error,
                })
            }
            LoopExit::Exhausted { attempts, .. } => {
                warn!("Gave up on job {} after {} attempt(s)", id, attempts);
                Err(WatchError::TimeoutExceeded {
                    id,
                    attempts,
                    last: current,
                })
            }
            LoopExit::Cancelled { attempts, .. } => {
                debug!("Watch of job {} cancelled", id);
                Err(WatchError::Cancelled { id, attempts })
            }
        }
    }

    /// Runs [`watch`](Self::watch) in its own task
    pub fn spawn_watch<F>(&self, handle: JobHandle, options: WatchOptions, on_update: F) -> WatchTask
    where
        F: FnMut(&JobSnapshot) + Send + 'static,
    {
        let poller = self.clone();
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let id = handle.id().clone();

        let task = tokio::spawn(async move {
            poller
                .watch_with_cancel(&handle, on_update, options, &token)
                .await
        });

        WatchTask { id, cancel, task }
    }
}

/// A watch loop running in the background
#[derive(Debug)]
pub struct WatchTask {
    id: JobId,
    cancel: CancelToken,
    task: JoinHandle<Result<WatchOutcome, WatchError>>,
}

impl WatchTask {
    pub fn id(&self) -> &JobId {
        &self.id
    }

    /// Stops scheduling further polls of this job only
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Waits for the loop to finish
    pub async fn join(self) -> Result<WatchOutcome, WatchError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Err(WatchError::Cancelled {
                id: self.id,
                attempts: 0,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedService, completed, failed, pending, rejected, submitted};
    use adforge_core::domain::job::JobStatus;
    use adforge_core::dto::job::{CreateCreative, JobDescriptor};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn options() -> WatchOptions {
        WatchOptions::default().with_interval(Duration::from_secs(1))
    }

    fn creative() -> CreativeRequest {
        CreativeRequest::Creative(CreateCreative::new("https://bg.jpg", "Protein"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_returns_pending_handle() {
        let service = ScriptedService::new().with_submission(vec![submitted("a")]);
        let poller = JobPoller::new(service.clone());

        let handle = poller.submit(&creative()).await.unwrap();

        assert_eq!(handle.id(), &JobId::new("a"));
        assert_eq!(handle.initial_job().status(), JobStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_without_uid_fails_and_never_polls() {
        let service = ScriptedService::new().with_submission(vec![JobDescriptor {
            status: "pending".to_string(),
            ..Default::default()
        }]);
        let poller = JobPoller::new(service.clone());

        let err = poller.submit(&creative()).await.unwrap_err();

        assert!(matches!(err, SubmissionError::MissingIdentifier));
        assert_eq!(service.total_status_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_rejected_by_service() {
        let service = ScriptedService::new().with_submission_error(|| {
            adforge_client::ClientError::api_error(502, "bad gateway")
        });
        let poller = JobPoller::new(service);

        let err = poller.submit(&creative()).await.unwrap_err();

        assert!(matches!(err, SubmissionError::Rejected { status: 502, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_batch_skips_descriptors_without_uid() {
        let service = ScriptedService::new().with_submission(vec![
            submitted("a"),
            JobDescriptor::default(),
            submitted("b"),
        ]);
        let poller = JobPoller::new(service);

        let handles = poller.submit_batch(&CreativeRequest::Batch).await.unwrap();

        let ids: Vec<_> = handles.iter().map(|h| h.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_unknown_job_is_rejected() {
        let service = ScriptedService::new();
        let poller = JobPoller::new(service);

        let err = poller
            .poll(&JobHandle::new(JobId::new("ghost")))
            .await
            .unwrap_err();

        assert!(err.is_job_gone());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_reaches_completed() {
        let service = ScriptedService::new().with_script("a", vec![pending("a"), completed("a")]);
        let poller = JobPoller::new(service.clone());
        let handle = JobHandle::new(JobId::new("a"));
        let mut updates = Vec::new();

        let outcome = poller
            .watch(&handle, |s| updates.push(s.job.status()), options())
            .await
            .unwrap();

        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.job.status(), JobStatus::Completed);
        assert!(outcome.job.result_url().is_some());
        assert_eq!(updates, vec![JobStatus::Pending, JobStatus::Completed]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_with_zero_interval_still_completes() {
        let service = ScriptedService::new().with_script("a", vec![pending("a"), completed("a")]);
        let poller = JobPoller::new(service.clone());

        let outcome = poller
            .watch(
                &JobHandle::new(JobId::new("a")),
                |_| {},
                WatchOptions::default().with_interval(Duration::ZERO),
            )
            .await
            .unwrap();

        assert_eq!(outcome.job.status(), JobStatus::Completed);
        assert_eq!(service.status_calls("a"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_ends_on_failed_status() {
        let service = ScriptedService::new().with_script("a", vec![pending("a"), failed("a")]);
        let poller = JobPoller::new(service);

        let outcome = poller
            .watch(&JobHandle::new(JobId::new("a")), |_| {}, options())
            .await
            .unwrap();

        assert_eq!(outcome.job.status(), JobStatus::Failed);
        assert_eq!(outcome.job.result_url(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_stops_polling_after_poll_error() {
        let service = ScriptedService::new().with_script(
            "a",
            vec![pending("a"), rejected(), pending("a"), completed("a")],
        );
        let poller = JobPoller::new(service.clone());

        let task = poller.spawn_watch(JobHandle::new(JobId::new("a")), options(), |_| {});
        let err = task.join().await.unwrap_err();

        assert!(matches!(err, WatchError::Poll { attempt: 2, .. }));
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(service.status_calls("a"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_gives_up_after_max_attempts() {
        let service = ScriptedService::new().with_script("a", vec![pending("a")]);
        let poller = JobPoller::new(service.clone());

        let err = poller
            .watch(
                &JobHandle::new(JobId::new("a")),
                |_| {},
                options().with_max_attempts(3),
            )
            .await
            .unwrap_err();

        match err {
            WatchError::TimeoutExceeded { attempts, last, .. } => {
                assert_eq!(attempts, 3);
                assert_eq!(last.status(), JobStatus::Pending);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(service.status_calls("a"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelling_one_watch_leaves_sibling_running() {
        let service = ScriptedService::new()
            .with_script("a", vec![pending("a")])
            .with_script(
                "b",
                vec![pending("b"), pending("b"), pending("b"), completed("b")],
            );
        let poller = JobPoller::new(service.clone());

        let a = poller.spawn_watch(JobHandle::new(JobId::new("a")), options(), |_| {});
        let b = poller.spawn_watch(JobHandle::new(JobId::new("b")), options(), |_| {});

        tokio::time::sleep(Duration::from_millis(1500)).await;
        a.cancel();

        assert!(matches!(a.join().await, Err(WatchError::Cancelled { .. })));
        let outcome = b.join().await.unwrap();
        assert_eq!(outcome.job.status(), JobStatus::Completed);
        assert_eq!(service.status_calls("a"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_earlier_completion_is_reported_first() {
        let service = ScriptedService::new()
            .with_script("slow", vec![pending("slow"), pending("slow"), completed("slow")])
            .with_script("fast", vec![completed("fast")]);
        let poller = JobPoller::new(service);
        let (tx, mut rx) = mpsc::unbounded_channel();

        // Submitted first, completes last
        let mut tasks = Vec::new();
        for id in ["slow", "fast"] {
            let tx = tx.clone();
            tasks.push(poller.spawn_watch(
                JobHandle::new(JobId::new(id)),
                options(),
                move |snapshot| {
                    if snapshot.job.status() == JobStatus::Completed {
                        let _ = tx.send(snapshot.job.id().clone());
                    }
                },
            ));
        }
        drop(tx);
        for task in tasks {
            task.join().await.unwrap();
        }

        let mut order = Vec::new();
        while let Some(id) = rx.recv().await {
            order.push(id);
        }
        assert_eq!(order, vec![JobId::new("fast"), JobId::new("slow")]);
    }
}
