//! Stub service configuration

/// Stub service configuration
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Address to listen on (e.g., "0.0.0.0:3000")
    pub bind_addr: String,

    /// Status queries answered with "pending" before a job completes
    pub pending_polls: u32,

    /// Descriptors returned by a batch creation request
    pub batch_size: usize,

    /// Prefix of the rendered image URLs
    pub image_base_url: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            pending_polls: 1,
            batch_size: 3,
            image_base_url: "https://images.adforge.local/renders".to_string(),
        }
    }
}

impl MockConfig {
    /// Creates configuration from environment variables
    ///
    /// - MOCK_BIND_ADDR (default: 0.0.0.0:3000)
    /// - MOCK_PENDING_POLLS (default: 1)
    /// - MOCK_BATCH_SIZE (default: 3)
    /// - MOCK_IMAGE_BASE_URL (default: https://images.adforge.local/renders)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: std::env::var("MOCK_BIND_ADDR").unwrap_or(defaults.bind_addr),
            pending_polls: std::env::var("MOCK_PENDING_POLLS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.pending_polls),
            batch_size: std::env::var("MOCK_BATCH_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.batch_size),
            image_base_url: std::env::var("MOCK_IMAGE_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.image_base_url),
        }
    }
}
