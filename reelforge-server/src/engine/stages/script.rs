//! Local script writer
//!
//! Deterministic stand-in for an LLM script backend. Segment count follows
//! the target duration at roughly six seconds of narration per segment.

use anyhow::Result;
use async_trait::async_trait;
use reelforge_core::domain::job::JobRequest;

use super::{Script, ScriptWriter, Segment};

/// Seconds of narration one segment covers.
const SECONDS_PER_SEGMENT: u32 = 6;
const MAX_SEGMENTS: u32 = 20;

pub struct LocalScriptWriter;

impl LocalScriptWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalScriptWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScriptWriter for LocalScriptWriter {
    async fn write(&self, request: &JobRequest) -> Result<Script> {
        let count = (request.duration / SECONDS_PER_SEGMENT).clamp(1, MAX_SEGMENTS);
        let prompt = request.prompt.trim();

        let segments = (1..=count)
            .map(|i| Segment {
                text: format!("Narration segment {} of {}: {}.", i, count, prompt),
                image_query: format!("{} scene {}", prompt, i),
            })
            .collect();

        Ok(Script {
            language: "English".to_string(),
            segments,
        })
    }

    async fn translate(&self, script: &Script, language: &str) -> Result<Script> {
        // Visual queries stay in English; only narration text changes.
        let segments = script
            .segments
            .iter()
            .map(|s| Segment {
                text: format!("[{}] {}", language, s.text),
                image_query: s.image_query.clone(),
            })
            .collect();

        Ok(Script {
            language: language.to_string(),
            segments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelforge_core::domain::job::Orientation;

    fn request(duration: u32) -> JobRequest {
        JobRequest {
            prompt: "cats playing".to_string(),
            duration,
            voice_id: "en-US-GuyNeural".to_string(),
            orientation: Orientation::Landscape,
            mood: "fun".to_string(),
        }
    }

    #[tokio::test]
    async fn test_segment_count_follows_duration() {
        let writer = LocalScriptWriter::new();

        assert_eq!(writer.write(&request(30)).await.unwrap().segments.len(), 5);
        assert_eq!(writer.write(&request(60)).await.unwrap().segments.len(), 10);
        // Very short requests still get one segment, very long ones are capped.
        assert_eq!(writer.write(&request(1)).await.unwrap().segments.len(), 1);
        assert_eq!(writer.write(&request(600)).await.unwrap().segments.len(), 20);
    }

    #[tokio::test]
    async fn test_translate_keeps_image_queries() {
        let writer = LocalScriptWriter::new();
        let script = writer.write(&request(30)).await.unwrap();

        let dubbed = writer.translate(&script, "Hindi").await.unwrap();

        assert_eq!(dubbed.language, "Hindi");
        assert_eq!(dubbed.segments.len(), script.segments.len());
        for (original, translated) in script.segments.iter().zip(&dubbed.segments) {
            assert_eq!(original.image_query, translated.image_query);
            assert_ne!(original.text, translated.text);
        }
    }
}
