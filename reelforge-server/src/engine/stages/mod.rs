//! Stage executors
//!
//! The four pipeline stages (script writing, media fetching, voice
//! synthesis, video rendering) are opaque transformations behind async
//! traits. The engine only depends on the traits; the `Local*`
//! implementations here produce deterministic artifacts on disk so the
//! whole pipeline runs without network access to generation backends.

pub mod media;
pub mod render;
pub mod script;
pub mod voice;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reelforge_core::domain::job::{JobRequest, Orientation};

pub use media::LocalMediaFetcher;
pub use render::LocalVideoRenderer;
pub use script::LocalScriptWriter;
pub use voice::LocalVoiceSynthesizer;

/// A generated script: ordered narration segments plus the language the
/// narration is written in.
#[derive(Debug, Clone)]
pub struct Script {
    pub language: String,
    pub segments: Vec<Segment>,
}

/// One script segment: narration text plus an English visual search query.
#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    pub image_query: String,
}

/// Footage or imagery fetched for one segment.
#[derive(Debug, Clone)]
pub struct MediaClip {
    pub query: String,
    pub data: Vec<u8>,
}

/// Synthesized narration audio for one segment.
#[derive(Debug, Clone)]
pub struct VoiceTrack {
    pub voice_id: String,
    pub data: Vec<u8>,
}

/// Render parameters for one output file.
#[derive(Debug, Clone)]
pub struct RenderSpec {
    /// File stem of the output, e.g. the job id or `{job_id}_hindi`.
    pub output_stem: String,
    pub orientation: Orientation,
    pub mood: String,
}

/// Writes a narration script for a creation request.
#[async_trait]
pub trait ScriptWriter: Send + Sync {
    async fn write(&self, request: &JobRequest) -> Result<Script>;

    /// Translates narration text into `language`, keeping visual queries
    /// in English.
    async fn translate(&self, script: &Script, language: &str) -> Result<Script>;
}

/// Fetches footage or imagery for one visual query.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, query: &str, orientation: Orientation) -> Result<MediaClip>;
}

/// Synthesizes narration audio for one segment.
#[async_trait]
pub trait VoiceSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<VoiceTrack>;
}

/// Assembles segments into a video file and derives its thumbnail.
#[async_trait]
pub trait VideoRenderer: Send + Sync {
    async fn render(
        &self,
        spec: &RenderSpec,
        script: &Script,
        media: &[MediaClip],
        voices: &[VoiceTrack],
    ) -> Result<PathBuf>;

    async fn thumbnail(&self, video_path: &Path, prompt: &str) -> Result<PathBuf>;
}

/// The full set of stage executors a pipeline runs against.
#[derive(Clone)]
pub struct StageSet {
    pub script: Arc<dyn ScriptWriter>,
    pub media: Arc<dyn MediaFetcher>,
    pub voice: Arc<dyn VoiceSynthesizer>,
    pub renderer: Arc<dyn VideoRenderer>,
}

impl StageSet {
    /// Stage set backed entirely by the local deterministic executors.
    pub fn local(output_dir: &Path) -> Self {
        Self {
            script: Arc::new(LocalScriptWriter::new()),
            media: Arc::new(LocalMediaFetcher::new()),
            voice: Arc::new(LocalVoiceSynthesizer::new()),
            renderer: Arc::new(LocalVideoRenderer::new(output_dir.to_path_buf())),
        }
    }
}

/// Expands a label and seed string into a deterministic byte payload.
///
/// The local executors stand in for real generation backends, so the only
/// requirement on their output is that it is non-empty and stable for the
/// same inputs.
pub(crate) fn deterministic_bytes(label: &str, seed: &str, len: usize) -> Vec<u8> {
    let mut state: u64 = 0xcbf2_9ce4_8422_2325;
    for b in label.bytes().chain(seed.bytes()) {
        state ^= u64::from(b);
        state = state.wrapping_mul(0x0000_0100_0000_01b3);
    }

    let mut out = Vec::with_capacity(len + label.len() + 1);
    out.extend_from_slice(label.as_bytes());
    out.push(0);
    while out.len() < len {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        out.extend_from_slice(&state.to_le_bytes());
    }
    out.truncate(len);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_bytes_are_stable() {
        let a = deterministic_bytes("clip", "cats playing", 256);
        let b = deterministic_bytes("clip", "cats playing", 256);
        assert_eq!(a, b);
        assert_eq!(a.len(), 256);
    }

    #[test]
    fn test_deterministic_bytes_vary_with_seed() {
        let a = deterministic_bytes("clip", "cats", 256);
        let b = deterministic_bytes("clip", "dogs", 256);
        assert_ne!(a, b);
    }
}
