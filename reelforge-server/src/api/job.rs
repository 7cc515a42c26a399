//! Job API Handlers
//!
//! HTTP endpoints for submitting creation requests and polling job status.

use axum::{
    Json,
    extract::{Path, State},
};
use reelforge_core::dto::job::{CreateJobRequest, CreateJobResponse, StatusResponse};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::ApiResult;

/// POST /create
/// Validate a creation request and enqueue a new job
///
/// Returns the new job id immediately; the engine picks the job up
/// asynchronously. Validation failures are rejected synchronously and no
/// job record is created.
pub async fn create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> ApiResult<Json<CreateJobResponse>> {
    tracing::info!("Creation request: {}", req.prompt);

    let job_id = state.store.insert(req.into()).await?;

    Ok(Json(CreateJobResponse { job_id }))
}

/// GET /status/{job_id}
/// Current job snapshot for polling clients
///
/// Read-only and idempotent; safe to call at any frequency.
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<StatusResponse>> {
    tracing::debug!("Status poll: {}", job_id);

    let job = state.store.get(job_id).await?;

    Ok(Json(StatusResponse::from(&job)))
}
