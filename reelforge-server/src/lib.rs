//! Reelforge Server
//!
//! The media-generation job engine and its HTTP API.
//!
//! Architecture:
//! - Store: in-memory job records, the single source of truth for status
//! - Engine: claims queued jobs and runs the four-stage pipeline
//! - API: creation, status polling, and artifact download endpoints
//!
//! Clients submit a creation request, poll `/status/{job_id}`, and download
//! the finished artifacts once the job completes.

pub mod api;
pub mod config;
pub mod engine;
pub mod store;
