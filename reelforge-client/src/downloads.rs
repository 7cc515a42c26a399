//! Artifact download endpoints

use crate::EngineClient;
use crate::error::Result;
use uuid::Uuid;

impl EngineClient {
    /// Download the primary video for a completed job
    pub async fn download_video(&self, job_id: Uuid) -> Result<Vec<u8>> {
        let url = format!("{}/download/{}", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_bytes_response(response).await
    }

    /// Download the thumbnail for a completed job
    pub async fn download_thumbnail(&self, job_id: Uuid) -> Result<Vec<u8>> {
        let url = format!("{}/download/thumbnail/{}", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_bytes_response(response).await
    }

    /// Download the dubbed variant for a language (matched case-insensitively)
    pub async fn download_dub(&self, job_id: Uuid, language: &str) -> Result<Vec<u8>> {
        let url = format!("{}/download/dub/{}/{}", self.base_url, job_id, language);
        let response = self.client.get(&url).send().await?;

        self.handle_bytes_response(response).await
    }
}
