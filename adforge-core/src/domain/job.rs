//! Job domain types

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque job identifier assigned by the creative service
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Wraps a service-assigned identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for JobId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

/// Job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

impl JobStatus {
    /// Completed and Failed are absorbing
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creative-generation job
///
/// The fields are private so the result URL can only be present on a
/// completed job. Build one with [`Job::pending`], [`Job::completed`],
/// [`Job::failed`] or from a [`JobDescriptor`](crate::dto::job::JobDescriptor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    id: JobId,
    status: JobStatus,
    result_url: Option<String>,
}

impl Job {
    pub fn pending(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            result_url: None,
        }
    }

    pub fn completed(id: JobId, result_url: impl Into<String>) -> Self {
        Self {
            id,
            status: JobStatus::Completed,
            result_url: Some(result_url.into()),
        }
    }

    pub fn failed(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Failed,
            result_url: None,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn result_url(&self) -> Option<&str> {
        self.result_url.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Applies a newer observation of the same job
    ///
    /// Returns `true` if the job changed. Updates for another id and any
    /// update after a terminal state are ignored.
    pub fn merge(&mut self, next: Job) -> bool {
        if self.is_terminal() || next.id != self.id || *self == next {
            return false;
        }
        *self = next;
        true
    }
}

/// A job as observed by one status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSnapshot {
    pub job: Job,
    /// 1-based poll attempt that produced this snapshot
    pub attempt: u32,
    pub observed_at: chrono::DateTime<chrono::Utc>,
}

impl JobSnapshot {
    pub fn new(job: Job, attempt: u32) -> Self {
        Self {
            job,
            attempt,
            observed_at: chrono::Utc::now(),
        }
    }
}
