//! Batch submissions
//!
//! A batch request yields several jobs at once (one per ad variant). The
//! [`BatchTracker`] keeps the tracked set: unique ids only, at most `cap`
//! of them, in admission order. [`JobPoller::run_batch`] watches every
//! admitted job concurrently and applies their updates in arrival order.

use std::collections::HashMap;

use adforge_core::domain::job::{Job, JobId, JobSnapshot};
use adforge_core::dto::job::CreativeRequest;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::config::WatchOptions;
use crate::error::{PollError, SubmissionError, WatchError};
use crate::poller::{JobHandle, JobPoller, WatchOutcome};

/// Keyed, capped collection of the jobs a batch follows
#[derive(Debug, Clone)]
pub struct BatchTracker {
    cap: usize,
    order: Vec<JobId>,
    jobs: HashMap<JobId, Job>,
}

impl BatchTracker {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            order: Vec::with_capacity(cap),
            jobs: HashMap::with_capacity(cap),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Starts tracking `handles`, skipping duplicates and anything past the cap
    ///
    /// # Returns
    /// The handles that were admitted
    pub fn admit(&mut self, handles: impl IntoIterator<Item = JobHandle>) -> Vec<JobHandle> {
        let mut admitted = Vec::new();

        for handle in handles {
            if self.jobs.contains_key(handle.id()) {
                debug!("Ignoring duplicate job {}", handle.id());
                continue;
            }
            if self.order.len() >= self.cap {
                debug!("Batch cap {} reached, dropping job {}", self.cap, handle.id());
                continue;
            }

            self.order.push(handle.id().clone());
            self.jobs.insert(handle.id().clone(), handle.initial_job());
            admitted.push(handle);
        }

        admitted
    }

    /// Applies a snapshot to its tracked job
    ///
    /// Returns `true` if the tracked job changed. Snapshots of untracked
    /// jobs are ignored.
    pub fn record(&mut self, snapshot: &JobSnapshot) -> bool {
        self.jobs
            .get_mut(snapshot.job.id())
            .is_some_and(|job| job.merge(snapshot.job.clone()))
    }

    pub fn remove(&mut self, id: &JobId) -> Option<Job> {
        let job = self.jobs.remove(id)?;
        self.order.retain(|tracked| tracked != id);
        Some(job)
    }

    pub fn get(&self, id: &JobId) -> Option<&Job> {
        self.jobs.get(id)
    }

    /// Tracked jobs in admission order
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.order.iter().filter_map(|id| self.jobs.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn all_terminal(&self) -> bool {
        self.jobs.values().all(Job::is_terminal)
    }

    pub fn into_jobs(mut self) -> Vec<Job> {
        self.order
            .iter()
            .filter_map(|id| self.jobs.remove(id))
            .collect()
    }
}

/// Result of [`JobPoller::run_batch`]
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Tracked set at the end of the run, in admission order
    pub jobs: Vec<Job>,
    /// Jobs dropped from the tracked set because polling failed
    pub removed: Vec<PollError>,
    /// Jobs still pending when their watch ran out of attempts or time
    pub timed_out: Vec<JobId>,
    /// Jobs whose watch was cancelled
    pub cancelled: Vec<JobId>,
}

impl BatchReport {
    pub fn completed(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|job| job.result_url().is_some())
    }
}

enum BatchEvent {
    Update(JobSnapshot),
    Finished(JobId, Result<WatchOutcome, WatchError>),
}

impl JobPoller {
    /// Submits a batch request and watches every admitted job
    ///
    /// At most `cap` unique jobs are tracked. A job whose watch fails with a
    /// [`PollError`] is removed from the tracked set; its siblings keep
    /// going. `on_change` sees every change to a tracked job.
    ///
    /// A zero `cap` fails before anything is submitted.
    pub async fn run_batch<F>(
        &self,
        request: &CreativeRequest,
        cap: usize,
        options: WatchOptions,
        cancel: &CancelToken,
        mut on_change: F,
    ) -> Result<BatchReport, SubmissionError>
    where
        F: FnMut(&Job),
    {
        if cap == 0 {
            return Err(SubmissionError::ZeroBatchCap);
        }
        let handles = self.submit_batch(request).await?;

        let mut tracker = BatchTracker::new(cap);
        let admitted = tracker.admit(handles);
        info!("Tracking {} job(s) from batch", admitted.len());

        let (events_tx, mut events) = mpsc::unbounded_channel();
        // Dropping the set aborts any watch still running
        let mut watches = JoinSet::new();

        for handle in admitted {
            let poller = self.clone();
            let events_tx = events_tx.clone();
            let cancel = cancel.clone();

            watches.spawn(async move {
                let result = poller
                    .watch_with_cancel(
                        &handle,
                        |snapshot| {
                            let _ = events_tx.send(BatchEvent::Update(snapshot.clone()));
                        },
                        options,
                        &cancel,
                    )
                    .await;
                let _ = events_tx.send(BatchEvent::Finished(handle.id().clone(), result));
            });
        }
        drop(events_tx);

        let mut report = BatchReport::default();

        while let Some(event) = events.recv().await {
            match event {
                BatchEvent::Update(snapshot) => {
                    if tracker.record(&snapshot) {
                        if let Some(job) = tracker.get(snapshot.job.id()) {
                            on_change(job);
                        }
                    }
                }
                BatchEvent::Finished(_, Ok(_)) => {}
                BatchEvent::Finished(id, Err(WatchError::Poll { source, .. })) => {
                    warn!("Removing job {} from batch: {}", id, source);
                    tracker.remove(&id);
                    report.removed.push(source);
                }
                BatchEvent::Finished(id, Err(WatchError::TimeoutExceeded { .. })) => {
                    report.timed_out.push(id);
                }
                BatchEvent::Finished(id, Err(WatchError::Cancelled { .. })) => {
                    report.cancelled.push(id);
                }
            }
        }

        report.jobs = tracker.into_jobs();
        info!(
            "Batch finished: {} tracked, {} removed",
            report.jobs.len(),
            report.removed.len()
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedService, completed, pending, rejected, submitted};
    use adforge_core::domain::job::JobStatus;
    use proptest::prelude::*;
    use std::time::Duration;

    fn handles(ids: &[&str]) -> Vec<JobHandle> {
        ids.iter().map(|id| JobHandle::new(JobId::new(*id))).collect()
    }

    fn options() -> WatchOptions {
        WatchOptions::default().with_interval(Duration::from_secs(1))
    }

    #[test]
    fn test_admit_deduplicates_and_caps() {
        let mut tracker = BatchTracker::new(3);

        let admitted = tracker.admit(handles(&["a", "b", "a", "c", "d"]));

        let ids: Vec<_> = admitted.iter().map(|h| h.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(tracker.len(), 3);
        assert!(tracker.admit(handles(&["a"])).is_empty());
    }

    #[test]
    fn test_record_ignores_untracked_and_terminal_jobs() {
        let mut tracker = BatchTracker::new(3);
        tracker.admit(handles(&["a"]));

        let done = JobSnapshot::new(Job::completed(JobId::new("a"), "https://img/a.jpg"), 1);
        assert!(tracker.record(&done));

        let again = JobSnapshot::new(Job::pending(JobId::new("a")), 2);
        assert!(!tracker.record(&again));
        assert_eq!(
            tracker.get(&JobId::new("a")).unwrap().status(),
            JobStatus::Completed
        );

        let stranger = JobSnapshot::new(Job::pending(JobId::new("z")), 1);
        assert!(!tracker.record(&stranger));
        assert!(tracker.all_terminal());
    }

    #[test]
    fn test_remove_keeps_admission_order() {
        let mut tracker = BatchTracker::new(3);
        tracker.admit(handles(&["a", "b", "c"]));

        assert!(tracker.remove(&JobId::new("b")).is_some());

        let ids: Vec<_> = tracker.jobs().map(|j| j.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    proptest! {
        /// Property: the tracked set never holds duplicates nor more than `cap` jobs.
        #[test]
        fn tracked_set_is_unique_and_capped(
            ids in prop::collection::vec("[a-e]", 0..12),
            cap in 1usize..5,
        ) {
            let mut tracker = BatchTracker::new(cap);
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
            tracker.admit(handles(&ids));

            let tracked: Vec<_> = tracker.jobs().map(|j| j.id().clone()).collect();
            let mut unique = tracked.clone();
            unique.sort();
            unique.dedup();

            prop_assert!(tracked.len() <= cap);
            prop_assert_eq!(unique.len(), tracked.len());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_of_three_completes() {
        let mut service = ScriptedService::new()
            .with_submission(vec![submitted("a"), submitted("b"), submitted("c")]);
        for id in ["a", "b", "c"] {
            service = service.with_script(id, vec![pending(id), completed(id)]);
        }
        let poller = JobPoller::new(service.clone());
        let mut changes = 0;

        let report = poller
            .run_batch(
                &CreativeRequest::Batch,
                3,
                options(),
                &CancelToken::new(),
                |_| changes += 1,
            )
            .await
            .unwrap();

        assert_eq!(report.jobs.len(), 3);
        assert!(report.jobs.iter().all(|j| j.result_url().is_some()));
        assert_eq!(report.completed().count(), 3);
        assert!(report.removed.is_empty());
        assert_eq!(changes, 3);
        for id in ["a", "b", "c"] {
            assert_eq!(service.status_calls(id), 2);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_ids_are_polled_once() {
        let service = ScriptedService::new()
            .with_submission(vec![submitted("a"), submitted("a"), submitted("b")])
            .with_script("a", vec![completed("a")])
            .with_script("b", vec![completed("b")]);
        let poller = JobPoller::new(service.clone());

        let report = poller
            .run_batch(&CreativeRequest::Batch, 3, options(), &CancelToken::new(), |_| {})
            .await
            .unwrap();

        assert_eq!(report.jobs.len(), 2);
        assert_eq!(service.status_calls("a"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_error_removes_only_that_job() {
        let service = ScriptedService::new()
            .with_submission(vec![submitted("a"), submitted("b"), submitted("c")])
            .with_script("a", vec![pending("a"), completed("a")])
            .with_script("b", vec![pending("b"), rejected()])
            .with_script("c", vec![pending("c"), pending("c"), completed("c")]);
        let poller = JobPoller::new(service.clone());

        let report = poller
            .run_batch(&CreativeRequest::Batch, 3, options(), &CancelToken::new(), |_| {})
            .await
            .unwrap();

        let ids: Vec<_> = report.jobs.iter().map(|j| j.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(report.removed.len(), 1);
        assert_eq!(report.removed[0].job_id(), &JobId::new("b"));
        assert_eq!(service.status_calls("b"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_error_starts_no_watch() {
        let service = ScriptedService::new().with_submission(Vec::new());
        let poller = JobPoller::new(service.clone());

        let err = poller
            .run_batch(&CreativeRequest::Batch, 3, options(), &CancelToken::new(), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::MissingIdentifier));
        assert_eq!(service.total_status_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_cap_submits_nothing() {
        let service = ScriptedService::new()
            .with_submission(vec![submitted("a")])
            .with_script("a", vec![completed("a")]);
        let poller = JobPoller::new(service.clone());

        let err = poller
            .run_batch(&CreativeRequest::Batch, 0, options(), &CancelToken::new(), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::ZeroBatchCap));
        assert_eq!(service.submit_calls(), 0);
        assert_eq!(service.total_status_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_every_watch() {
        let service = ScriptedService::new()
            .with_submission(vec![submitted("a"), submitted("b")])
            .with_script("a", vec![pending("a")])
            .with_script("b", vec![pending("b")]);
        let poller = JobPoller::new(service);
        let cancel = CancelToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2500)).await;
            trigger.cancel();
        });

        let report = poller
            .run_batch(&CreativeRequest::Batch, 3, options(), &cancel, |_| {})
            .await
            .unwrap();

        assert_eq!(report.cancelled.len(), 2);
        assert_eq!(report.jobs.len(), 2);
        assert!(report.jobs.iter().all(|j| j.status() == JobStatus::Pending));
    }
}
