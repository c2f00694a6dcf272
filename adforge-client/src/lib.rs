//! AdForge HTTP Client
//!
//! A small, typed HTTP client for the creative-generation service.
//!
//! The service exposes two endpoints: one that starts rendering a creative
//! (or a batch of variants) and one that reports the status of a render job.
//! [`CreativeClient`] wraps both, and [`JobService`] is the seam the poller
//! depends on so it can be driven by test doubles.
//!
//! # Example
//!
//! ```no_run
//! use adforge_client::CreativeClient;
//! use adforge_core::dto::job::{CreateCreative, CreativeRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CreativeClient::new("http://localhost:3000");
//!
//!     let response = client
//!         .create(&CreativeRequest::Creative(CreateCreative::new(
//!             "https://example.com/background.jpg",
//!             "Protein",
//!         )))
//!         .await?;
//!
//!     for descriptor in response.into_batch() {
//!         println!("Started job: {:?}", descriptor.uid);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod service;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use service::JobService;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the creative service
#[derive(Debug, Clone)]
pub struct CreativeClient {
    /// Base URL of the service (e.g., "http://localhost:3000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl CreativeClient {
    /// Create a new creative service client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service (e.g., "http://localhost:3000")
    ///
    /// # Example
    /// ```
    /// use adforge_client::CreativeClient;
    ///
    /// let client = CreativeClient::new("http://localhost:3000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use adforge_client::CreativeClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = CreativeClient::with_client("http://localhost:3000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle a service response and deserialize JSON
    ///
    /// Non-2xx statuses become [`ClientError::ApiError`] carrying the body text.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
