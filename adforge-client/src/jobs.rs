//! Creation and status endpoints

use adforge_core::domain::job::JobId;
use adforge_core::dto::job::{CreativeRequest, JobDescriptor, SubmitResponse};
use tracing::debug;

use crate::CreativeClient;
use crate::error::Result;

impl CreativeClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Start rendering a creative, or a batch of variants
    ///
    /// A [`CreativeRequest::Batch`] is sent without a body.
    ///
    /// # Returns
    /// The service response, which may hold one descriptor or several
    pub async fn create(&self, request: &CreativeRequest) -> Result<SubmitResponse> {
        let url = format!("{}/create", self.base_url);
        let builder = self.client.post(&url);
        let builder = match request {
            CreativeRequest::Creative(payload) => builder.json(payload),
            CreativeRequest::Batch => builder,
        };

        debug!("POST {}", url);
        let response = builder.send().await?;

        self.handle_response(response).await
    }

    /// Get the current status of a render job
    ///
    /// # Arguments
    /// * `job_id` - The identifier returned by [`create`](Self::create)
    pub async fn image_status(&self, job_id: &JobId) -> Result<JobDescriptor> {
        let url = format!("{}/create/image/{}", self.base_url, job_id);

        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
