//! Local voice synthesizer
//!
//! Deterministic stand-in for a TTS backend. Track length scales with the
//! narration length, mirroring how spoken audio grows with text.

use anyhow::Result;
use async_trait::async_trait;

use super::{VoiceSynthesizer, VoiceTrack, deterministic_bytes};

/// Bytes of synthetic audio per character of narration.
const BYTES_PER_CHAR: usize = 24;

pub struct LocalVoiceSynthesizer;

impl LocalVoiceSynthesizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalVoiceSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VoiceSynthesizer for LocalVoiceSynthesizer {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<VoiceTrack> {
        let len = text.len().max(1) * BYTES_PER_CHAR;

        Ok(VoiceTrack {
            voice_id: voice_id.to_string(),
            data: deterministic_bytes("voice", &format!("{} {}", voice_id, text), len),
        })
    }
}
