//! Job lifecycle endpoints

use std::time::Duration;

use crate::EngineClient;
use crate::error::Result;
use reelforge_core::dto::job::{CreateJobRequest, CreateJobResponse, StatusResponse};
use uuid::Uuid;

impl EngineClient {
    /// Submit a creation request and get the new job id
    ///
    /// The engine picks the job up asynchronously; poll with
    /// [`get_status`](Self::get_status) or block with
    /// [`wait_until_terminal`](Self::wait_until_terminal).
    pub async fn create_job(&self, req: &CreateJobRequest) -> Result<Uuid> {
        let url = format!("{}/create", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        let created: CreateJobResponse = self.handle_response(response).await?;
        Ok(created.job_id)
    }

    /// Get the current status snapshot for a job
    pub async fn get_status(&self, job_id: Uuid) -> Result<StatusResponse> {
        let url = format!("{}/status/{}", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Poll the status endpoint until the job completes or fails
    ///
    /// # Arguments
    /// * `job_id` - The job to wait for
    /// * `poll_interval` - Delay between polls (the engine assumes roughly
    ///   one second between polls; shorter intervals are tolerated)
    pub async fn wait_until_terminal(
        &self,
        job_id: Uuid,
        poll_interval: Duration,
    ) -> Result<StatusResponse> {
        loop {
            let status = self.get_status(job_id).await?;

            if status.status.is_terminal() {
                return Ok(status);
            }

            tracing::debug!(
                "Job {} at {:?} ({}%), polling again",
                job_id,
                status.status,
                status.progress
            );

            tokio::time::sleep(poll_interval).await;
        }
    }
}
