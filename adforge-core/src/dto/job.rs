//! Job DTOs for the creative service

use serde::{Deserialize, Serialize};

use crate::domain::job::{Job, JobId};

/// Payload describing a single creative to render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCreative {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_text: Option<String>,
}

impl CreateCreative {
    pub fn new(background_image: impl Into<String>, title_text: impl Into<String>) -> Self {
        Self {
            background_image: Some(background_image.into()),
            title_text: Some(title_text.into()),
        }
    }
}

/// What to ask the creation endpoint for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreativeRequest {
    /// One creative from an explicit payload
    Creative(CreateCreative),
    /// A batch of variants; sent without a body
    Batch,
}

/// Job descriptor as returned by both endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url_png: Option<String>,
}

/// Descriptor conversion errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("descriptor carries no job identifier")]
    MissingUid,
}

impl JobDescriptor {
    pub fn pending(id: &JobId) -> Self {
        Self {
            uid: Some(id.to_string()),
            status: "pending".to_string(),
            ..Default::default()
        }
    }

    pub fn completed(id: &JobId, image_url: impl Into<String>) -> Self {
        Self {
            uid: Some(id.to_string()),
            status: "completed".to_string(),
            image_url: Some(image_url.into()),
            image_url_png: None,
        }
    }

    /// The identifier, if present and non-blank
    pub fn job_id(&self) -> Option<JobId> {
        self.uid
            .as_deref()
            .map(str::trim)
            .filter(|uid| !uid.is_empty())
            .map(JobId::new)
    }

    /// Interprets this descriptor as the state of job `id`
    ///
    /// A "completed" status without an image is still pending; any status
    /// other than "pending" or "completed" is a failure.
    pub fn to_job(&self, id: JobId) -> Job {
        let image = self.image_url.as_deref().filter(|url| !url.is_empty());
        match (self.status.trim().to_ascii_lowercase().as_str(), image) {
            ("pending", _) | ("completed", None) => Job::pending(id),
            ("completed", Some(url)) => Job::completed(id, url),
            _ => Job::failed(id),
        }
    }
}

impl TryFrom<JobDescriptor> for Job {
    type Error = DescriptorError;

    fn try_from(descriptor: JobDescriptor) -> Result<Self, Self::Error> {
        let id = descriptor.job_id().ok_or(DescriptorError::MissingUid)?;
        Ok(descriptor.to_job(id))
    }
}

/// Body of a creation response: one descriptor or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmitResponse {
    Many(Vec<JobDescriptor>),
    One(JobDescriptor),
}

impl SubmitResponse {
    /// Canonical batch form; a single descriptor becomes a batch of one
    pub fn into_batch(self) -> Vec<JobDescriptor> {
        match self {
            Self::Many(descriptors) => descriptors,
            Self::One(descriptor) => vec![descriptor],
        }
    }
}
