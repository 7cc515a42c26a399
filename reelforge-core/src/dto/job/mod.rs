//! Job DTOs for the creation and status endpoints

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job::{Job, JobRequest, JobStatus, Orientation};

/// Request body for `POST /create`
///
/// Everything but the prompt has a server-side default matching what the
/// original web client sends when the user leaves a field untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobRequest {
    pub prompt: String,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_mood")]
    pub mood: String,
}

fn default_duration() -> u32 {
    30
}

fn default_voice_id() -> String {
    "en-US-GuyNeural".to_string()
}

fn default_mood() -> String {
    "random".to_string()
}

impl From<CreateJobRequest> for JobRequest {
    fn from(req: CreateJobRequest) -> Self {
        JobRequest {
            prompt: req.prompt,
            duration: req.duration,
            voice_id: req.voice_id,
            orientation: req.orientation,
            mood: req.mood,
        }
    }
}

/// Response body for `POST /create`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobResponse {
    pub job_id: Uuid,
}

/// Job snapshot returned by `GET /status/{job_id}`
///
/// Pollers get the status, the progress percentage, the failure cause if
/// any, and an artifact-presence map instead of raw server paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub artifacts: ArtifactAvailability,
}

/// Which artifacts a job currently has, without exposing server paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactAvailability {
    pub video: bool,
    pub thumbnail: bool,
    /// Languages for which a dubbed variant exists.
    pub dubbed_versions: Vec<String>,
}

impl From<&Job> for StatusResponse {
    fn from(job: &Job) -> Self {
        StatusResponse {
            job_id: job.id,
            status: job.status,
            progress: job.progress,
            error: job.error.clone(),
            artifacts: ArtifactAvailability {
                video: job.artifacts.video_path.is_some(),
                thumbnail: job.artifacts.thumbnail_path.is_some(),
                dubbed_versions: job.artifacts.dub_languages(),
            },
        }
    }
}
