//! Local video renderer
//!
//! Assembles the per-segment clips and voice tracks into one output file
//! under the configured output directory. The container format is a plain
//! length-prefixed concatenation; what matters to the engine is that the
//! file is non-empty, stable for the same inputs, and addressable by the
//! download API.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{MediaClip, RenderSpec, Script, VideoRenderer, VoiceTrack, deterministic_bytes};

pub struct LocalVideoRenderer {
    output_dir: PathBuf,
}

impl LocalVideoRenderer {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

#[async_trait]
impl VideoRenderer for LocalVideoRenderer {
    async fn render(
        &self,
        spec: &RenderSpec,
        script: &Script,
        media: &[MediaClip],
        voices: &[VoiceTrack],
    ) -> Result<PathBuf> {
        anyhow::ensure!(
            script.segments.len() == media.len() && media.len() == voices.len(),
            "segment/media/voice counts do not line up ({}/{}/{})",
            script.segments.len(),
            media.len(),
            voices.len()
        );

        let (width, height) = spec.orientation.dimensions();
        let mut payload = Vec::new();
        payload.extend_from_slice(
            format!(
                "REELFORGE1 {}x{} mood={} lang={} segments={}\n",
                width,
                height,
                spec.mood,
                script.language,
                script.segments.len()
            )
            .as_bytes(),
        );

        for ((segment, clip), track) in script.segments.iter().zip(media).zip(voices) {
            payload.extend_from_slice(&(segment.text.len() as u32).to_le_bytes());
            payload.extend_from_slice(segment.text.as_bytes());
            payload.extend_from_slice(&(clip.data.len() as u32).to_le_bytes());
            payload.extend_from_slice(&clip.data);
            payload.extend_from_slice(&(track.data.len() as u32).to_le_bytes());
            payload.extend_from_slice(&track.data);
        }

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("creating output dir {}", self.output_dir.display()))?;

        let path = self.output_dir.join(format!("{}.mp4", spec.output_stem));
        tokio::fs::write(&path, &payload)
            .await
            .with_context(|| format!("writing {}", path.display()))?;

        Ok(path)
    }

    async fn thumbnail(&self, video_path: &Path, prompt: &str) -> Result<PathBuf> {
        let stem = video_path
            .file_stem()
            .and_then(|s| s.to_str())
            .context("video path has no file stem")?;

        let path = self.output_dir.join(format!("{}.jpg", stem));
        let payload = deterministic_bytes("thumbnail", &format!("{} {}", stem, prompt), 4096);

        tokio::fs::write(&path, &payload)
            .await
            .with_context(|| format!("writing {}", path.display()))?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::stages::Segment;
    use reelforge_core::domain::job::Orientation;

    fn test_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("reelforge-render-{}-{}", name, uuid::Uuid::new_v4()))
    }

    fn fixtures() -> (Script, Vec<MediaClip>, Vec<VoiceTrack>) {
        let script = Script {
            language: "English".to_string(),
            segments: vec![Segment {
                text: "Narration segment 1 of 1: cats playing.".to_string(),
                image_query: "cats playing scene 1".to_string(),
            }],
        };
        let media = vec![MediaClip {
            query: "cats playing scene 1".to_string(),
            data: vec![1, 2, 3],
        }];
        let voices = vec![VoiceTrack {
            voice_id: "en-US-GuyNeural".to_string(),
            data: vec![4, 5, 6],
        }];
        (script, media, voices)
    }

    #[tokio::test]
    async fn test_render_writes_a_non_empty_file() {
        let renderer = LocalVideoRenderer::new(test_dir("render"));
        let (script, media, voices) = fixtures();
        let spec = RenderSpec {
            output_stem: "job1".to_string(),
            orientation: Orientation::Landscape,
            mood: "fun".to_string(),
        };

        let path = renderer.render(&spec, &script, &media, &voices).await.unwrap();

        assert!(path.ends_with("job1.mp4"));
        let bytes = tokio::fs::read(&path).await.unwrap();
        assert!(!bytes.is_empty());

        // Rendering again yields identical bytes.
        renderer.render(&spec, &script, &media, &voices).await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_render_rejects_mismatched_inputs() {
        let renderer = LocalVideoRenderer::new(test_dir("mismatch"));
        let (script, media, _) = fixtures();
        let spec = RenderSpec {
            output_stem: "job2".to_string(),
            orientation: Orientation::Landscape,
            mood: "fun".to_string(),
        };

        assert!(renderer.render(&spec, &script, &media, &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_thumbnail_sits_next_to_the_video() {
        let renderer = LocalVideoRenderer::new(test_dir("thumb"));
        let (script, media, voices) = fixtures();
        let spec = RenderSpec {
            output_stem: "job3".to_string(),
            orientation: Orientation::Portrait,
            mood: "calm".to_string(),
        };

        let video = renderer.render(&spec, &script, &media, &voices).await.unwrap();
        let thumb = renderer.thumbnail(&video, "cats playing").await.unwrap();

        assert!(thumb.ends_with("job3.jpg"));
        assert!(!tokio::fs::read(&thumb).await.unwrap().is_empty());
    }
}
