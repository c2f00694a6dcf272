//! Scripted job service for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use adforge_client::{ClientError, JobService, Result};
use adforge_core::domain::job::JobId;
use adforge_core::dto::job::{CreativeRequest, JobDescriptor};
use async_trait::async_trait;

/// One scripted status answer
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Reply(JobDescriptor),
    Reject,
}

pub(crate) fn submitted(id: &str) -> JobDescriptor {
    JobDescriptor::pending(&JobId::new(id))
}

pub(crate) fn pending(id: &str) -> Step {
    Step::Reply(JobDescriptor::pending(&JobId::new(id)))
}

pub(crate) fn completed(id: &str) -> Step {
    Step::Reply(JobDescriptor::completed(
        &JobId::new(id),
        format!("https://img.test/{}.jpg", id),
    ))
}

pub(crate) fn failed(id: &str) -> Step {
    Step::Reply(JobDescriptor {
        uid: Some(id.to_string()),
        status: "failed".to_string(),
        ..Default::default()
    })
}

pub(crate) fn rejected() -> Step {
    Step::Reject
}

enum Submission {
    Descriptors(Vec<JobDescriptor>),
    Error(fn() -> ClientError),
}

/// Answers status queries from per-job scripts
///
/// The last step of a script repeats once the script is exhausted.
/// Jobs without a script are rejected with a 400.
pub(crate) struct ScriptedService {
    submission: Mutex<Submission>,
    submissions: Mutex<usize>,
    scripts: Mutex<HashMap<JobId, VecDeque<Step>>>,
    calls: Mutex<HashMap<JobId, usize>>,
}

impl ScriptedService {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            submission: Mutex::new(Submission::Descriptors(Vec::new())),
            submissions: Mutex::new(0),
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
        })
    }

    pub(crate) fn with_submission(self: Arc<Self>, descriptors: Vec<JobDescriptor>) -> Arc<Self> {
        *self.submission.lock().unwrap() = Submission::Descriptors(descriptors);
        self
    }

    pub(crate) fn with_submission_error(self: Arc<Self>, error: fn() -> ClientError) -> Arc<Self> {
        *self.submission.lock().unwrap() = Submission::Error(error);
        self
    }

    pub(crate) fn with_script(self: Arc<Self>, id: &str, steps: Vec<Step>) -> Arc<Self> {
        self.scripts
            .lock()
            .unwrap()
            .insert(JobId::new(id), steps.into());
        self
    }

    pub(crate) fn status_calls(&self, id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&JobId::new(id))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn submit_calls(&self) -> usize {
        *self.submissions.lock().unwrap()
    }

    pub(crate) fn total_status_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl JobService for ScriptedService {
    async fn submit(&self, _request: &CreativeRequest) -> Result<Vec<JobDescriptor>> {
        *self.submissions.lock().unwrap() += 1;
        match &*self.submission.lock().unwrap() {
            Submission::Descriptors(descriptors) => Ok(descriptors.clone()),
            Submission::Error(error) => Err(error()),
        }
    }

    async fn status(&self, job_id: &JobId) -> Result<JobDescriptor> {
        *self.calls.lock().unwrap().entry(job_id.clone()).or_default() += 1;

        let step = {
            let mut scripts = self.scripts.lock().unwrap();
            scripts.get_mut(job_id).and_then(|script| {
                if script.len() > 1 {
                    script.pop_front()
                } else {
                    script.front().cloned()
                }
            })
        };

        match step {
            Some(Step::Reply(descriptor)) => Ok(descriptor),
            Some(Step::Reject) | None => Err(ClientError::api_error(400, "Unknown job")),
        }
    }
}
