//! Local media fetcher
//!
//! Deterministic stand-in for a stock-footage search backend. Clip size
//! scales with the frame so orientation changes are observable downstream.

use anyhow::Result;
use async_trait::async_trait;
use reelforge_core::domain::job::Orientation;

use super::{MediaClip, MediaFetcher, deterministic_bytes};

pub struct LocalMediaFetcher;

impl LocalMediaFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalMediaFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaFetcher for LocalMediaFetcher {
    async fn fetch(&self, query: &str, orientation: Orientation) -> Result<MediaClip> {
        let (width, height) = orientation.dimensions();
        let len = (width as usize * height as usize) / 4096;

        Ok(MediaClip {
            query: query.to_string(),
            data: deterministic_bytes("clip", &format!("{}x{} {}", width, height, query), len),
        })
    }
}
