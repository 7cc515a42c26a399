//! Core domain types
//!
//! This module contains the core domain structures used across Reelforge.
//! These types represent the fundamental business entities and are shared
//! between the server (which persists and mutates them) and clients (which
//! only ever read snapshots).

pub mod artifact;
pub mod job;
