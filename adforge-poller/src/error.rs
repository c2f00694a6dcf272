//! Error types for job submission and polling

use adforge_client::ClientError;
use adforge_core::domain::job::{Job, JobId};
use thiserror::Error;

/// A creation request did not yield a trackable job
///
/// Nothing is polled after one of these.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The service could not be reached
    #[error("creative service unreachable: {0}")]
    Unreachable(#[source] ClientError),

    /// The service answered with an error status
    #[error("creation rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be understood
    #[error("malformed creation response: {0}")]
    Malformed(String),

    /// The response carried no job identifier
    #[error("no job identifier received")]
    MissingIdentifier,

    /// A batch was requested with room for no job
    #[error("batch cap must be greater than 0")]
    ZeroBatchCap,
}

impl From<ClientError> for SubmissionError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ApiError { status, message } => Self::Rejected { status, message },
            ClientError::ParseError(message) => Self::Malformed(message),
            err @ ClientError::RequestFailed(_) => Self::Unreachable(err),
        }
    }
}

/// A status query failed
#[derive(Debug, Error)]
pub enum PollError {
    /// The service refused the job id (4xx); the job is presumed gone
    #[error("job {id} rejected by service (status {status}): {message}")]
    Rejected {
        id: JobId,
        status: u16,
        message: String,
    },

    /// Transport failure or server error
    #[error("status of job {id} unavailable: {source}")]
    Unavailable {
        id: JobId,
        #[source]
        source: ClientError,
    },

    /// The status body could not be understood
    #[error("malformed status for job {id}: {message}")]
    Malformed { id: JobId, message: String },
}

impl PollError {
    pub(crate) fn from_client(id: JobId, err: ClientError) -> Self {
        match err {
            ClientError::ApiError { status, message } if (400..500).contains(&status) => {
                Self::Rejected {
                    id,
                    status,
                    message,
                }
            }
            ClientError::ParseError(message) => Self::Malformed { id, message },
            source => Self::Unavailable { id, source },
        }
    }

    pub fn job_id(&self) -> &JobId {
        match self {
            Self::Rejected { id, .. } | Self::Unavailable { id, .. } | Self::Malformed { id, .. } => {
                id
            }
        }
    }

    /// Whether the service no longer recognizes the job
    pub fn is_job_gone(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// A watch loop ended without reaching a terminal status
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("polling stopped at attempt {attempt}: {source}")]
    Poll {
        attempt: u32,
        #[source]
        source: PollError,
    },

    #[error("job {id} still {} after {attempts} attempt(s)", .last.status())]
    TimeoutExceeded { id: JobId, attempts: u32, last: Job },

    #[error("watch of job {id} cancelled after {attempts} attempt(s)")]
    Cancelled { id: JobId, attempts: u32 },
}
