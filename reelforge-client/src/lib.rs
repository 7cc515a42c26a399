//! Typed HTTP client for the Reelforge engine.
//!
//! Wraps the three endpoint groups the engine exposes: job creation,
//! status polling, and artifact downloads. The CLI is the primary
//! consumer, but anything that can await a future can use it.
//!
//! ```no_run
//! use reelforge_client::EngineClient;
//! use reelforge_core::dto::job::CreateJobRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = EngineClient::new("http://localhost:8080");
//!
//!     let job_id = client
//!         .create_job(&CreateJobRequest {
//!             prompt: "cats playing".to_string(),
//!             duration: 30,
//!             voice_id: "en-US-GuyNeural".to_string(),
//!             orientation: Default::default(),
//!             mood: "fun".to_string(),
//!         })
//!         .await?;
//!
//!     let done = client
//!         .wait_until_terminal(job_id, std::time::Duration::from_secs(1))
//!         .await?;
//!     println!("{}: {:?}", job_id, done.status);
//!     Ok(())
//! }
//! ```

pub mod error;
mod downloads;
mod jobs;

pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Client over the engine HTTP API.
///
/// Cheap to clone; the underlying connection pool is shared. Endpoint
/// methods live in the `jobs` and `downloads` modules.
#[derive(Debug, Clone)]
pub struct EngineClient {
    base_url: String,
    client: Client,
}

impl EngineClient {
    /// Points a fresh client at the engine. A trailing slash on the URL
    /// is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Like [`new`](Self::new), but reuses a preconfigured reqwest client
    /// (timeouts, proxies, TLS).
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// The engine URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turns a non-success response into a [`ClientError::ApiError`]
    /// carrying the status code and the body the engine sent.
    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ClientError::api_error(status.as_u16(), body))
    }

    /// Checks the status and deserializes the JSON body.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        self.check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Checks the status and returns the raw body, for artifact endpoints.
    async fn handle_bytes_response(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        Ok(self.check_status(response).await?.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        for url in ["http://localhost:8080", "http://localhost:8080/"] {
            assert_eq!(EngineClient::new(url).base_url(), "http://localhost:8080");
        }

        let custom = EngineClient::with_client("http://engine:9000/", Client::new());
        assert_eq!(custom.base_url(), "http://engine:9000");
    }
}
