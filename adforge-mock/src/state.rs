//! In-memory job table

use std::collections::HashMap;
use std::sync::Arc;

use adforge_core::domain::job::JobId;
use adforge_core::dto::job::{CreateCreative, JobDescriptor};
use tokio::sync::RwLock;

use crate::config::MockConfig;

/// Shared state behind the stub router
///
/// Jobs are never evicted: the table grows for the life of the process and
/// a completed job keeps answering "completed".
#[derive(Debug, Clone)]
pub struct MockState {
    config: Arc<MockConfig>,
    /// Status queries seen per job
    jobs: Arc<RwLock<HashMap<JobId, u32>>>,
}

impl MockState {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config: Arc::new(config),
            jobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Registers a new pending job
    pub async fn create_job(&self, creative: Option<&CreateCreative>) -> JobDescriptor {
        let id = JobId::generate();
        self.jobs.write().await.insert(id.clone(), 0);

        match creative.and_then(|c| c.title_text.as_deref()) {
            Some(title) => tracing::info!("Job created: {} (title: {})", id, title),
            None => tracing::info!("Job created: {}", id),
        }
        JobDescriptor::pending(&id)
    }

    /// Answers one status query, or `None` for an unknown job
    pub async fn poll_job(&self, id: &JobId) -> Option<JobDescriptor> {
        let mut jobs = self.jobs.write().await;
        let polls = jobs.get_mut(id)?;
        *polls += 1;

        if *polls <= self.config.pending_polls {
            return Some(JobDescriptor::pending(id));
        }

        let base = &self.config.image_base_url;
        Some(JobDescriptor {
            image_url_png: Some(format!("{}/{}.png", base, id)),
            ..JobDescriptor::completed(id, format!("{}/{}.jpg", base, id))
        })
    }

    /// Number of status queries received for a job
    pub async fn poll_count(&self, id: &JobId) -> Option<u32> {
        self.jobs.read().await.get(id).copied()
    }
}
