//! Job service seam
//!
//! The poller talks to the creative service through this trait so that it
//! can be exercised against scripted doubles as well as the real client.

use adforge_core::domain::job::JobId;
use adforge_core::dto::job::{CreativeRequest, JobDescriptor};
use async_trait::async_trait;

use crate::CreativeClient;
use crate::error::Result;

/// Service trait for submitting and querying render jobs
#[async_trait]
pub trait JobService: Send + Sync {
    /// Submits a creation request
    ///
    /// # Returns
    /// Every descriptor in the response; a single-object response is a batch of one
    async fn submit(&self, request: &CreativeRequest) -> Result<Vec<JobDescriptor>>;

    /// Queries the status of one job
    async fn status(&self, job_id: &JobId) -> Result<JobDescriptor>;
}

#[async_trait]
impl JobService for CreativeClient {
    async fn submit(&self, request: &CreativeRequest) -> Result<Vec<JobDescriptor>> {
        Ok(self.create(request).await?.into_batch())
    }

    async fn status(&self, job_id: &JobId) -> Result<JobDescriptor> {
        self.image_status(job_id).await
    }
}
