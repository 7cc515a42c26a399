//! Download API Handlers
//!
//! Serve finished artifacts: the primary video, its thumbnail, and dubbed
//! variants. Artifacts are only served once the job is completed; the same
//! job and selector always yield the same bytes while the files are
//! retained.

use std::path::Path as FsPath;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use reelforge_core::domain::job::{Job, JobStatus};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// GET /download/{job_id}
/// Primary video bytes
pub async fn download_video(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let job = completed_job(&state, job_id).await?;

    let path = job
        .artifacts
        .video_path
        .as_deref()
        .ok_or_else(|| ApiError::NotFound(format!("Job {} has no video artifact", job_id)))?;

    serve_file(path, "video/mp4").await
}

/// GET /download/thumbnail/{job_id}
/// Thumbnail bytes
pub async fn download_thumbnail(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let job = completed_job(&state, job_id).await?;

    let path = job
        .artifacts
        .thumbnail_path
        .as_deref()
        .ok_or_else(|| ApiError::NotFound(format!("Job {} has no thumbnail artifact", job_id)))?;

    serve_file(path, "image/jpeg").await
}

/// GET /download/dub/{job_id}/{language}
/// Dubbed variant bytes for that language (matched case-insensitively)
pub async fn download_dub(
    State(state): State<AppState>,
    Path((job_id, language)): Path<(Uuid, String)>,
) -> ApiResult<impl IntoResponse> {
    let job = completed_job(&state, job_id).await?;

    let dub = job.artifacts.dub(&language).ok_or_else(|| {
        ApiError::NotFound(format!("Job {} has no '{}' dub", job_id, language))
    })?;

    serve_file(&dub.path, "video/mp4").await
}

/// Loads the job and requires it to be completed before any artifact is
/// served. Non-terminal and failed jobs both yield `not_ready`: neither has
/// a finished artifact set, and the failed case reports its cause through
/// the status endpoint.
async fn completed_job(state: &AppState, job_id: Uuid) -> ApiResult<Job> {
    let job = state.store.get(job_id).await?;

    if job.status != JobStatus::Completed {
        return Err(ApiError::NotReady(format!(
            "Job {} is not completed (current status: {:?})",
            job_id, job.status
        )));
    }

    Ok(job)
}

/// Reads the artifact from disk and attaches download headers.
async fn serve_file(path: &FsPath, content_type: &'static str) -> ApiResult<impl IntoResponse + use<>> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ApiError::NotFound("Artifact file missing on server".to_string())
        } else {
            ApiError::InternalError(format!("Failed to read {}: {}", path.display(), e))
        }
    })?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("artifact");

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    ))
}
