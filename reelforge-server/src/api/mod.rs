//! API Module
//!
//! HTTP API layer for the engine.
//! Each submodule handles endpoints for a specific concern.

pub mod download;
pub mod error;
pub mod health;
pub mod job;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::store::JobStore;

/// Shared state for all API handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JobStore>,
}

/// Create the main API router with all endpoints
pub fn create_router(store: Arc<JobStore>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Creation and status
        .route("/create", post(job::create_job))
        .route("/status/{job_id}", get(job::job_status))
        // Artifact downloads
        .route("/download/{job_id}", get(download::download_video))
        .route(
            "/download/thumbnail/{job_id}",
            get(download::download_thumbnail),
        )
        .route(
            "/download/dub/{job_id}/{language}",
            get(download::download_dub),
        )
        // Add state and middleware
        .with_state(AppState { store })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
