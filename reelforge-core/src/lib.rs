//! Reelforge Core
//!
//! Core types and abstractions for the Reelforge media-generation engine.
//!
//! This crate contains:
//! - Domain types: Core business entities (Job, JobStatus, artifacts)
//! - DTOs: Data transfer objects for the HTTP API

pub mod domain;
pub mod dto;
