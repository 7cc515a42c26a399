//! Job domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::artifact::JobArtifacts;

/// One end-to-end media creation request and its evolving state.
///
/// Structure shared between the HTTP API (read-only snapshots) and the
/// engine (sole mutator, always through the job store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub status: JobStatus,
    /// 0-100, monotonically non-decreasing while the job is non-terminal.
    pub progress: u8,
    /// Immutable snapshot of the creation parameters.
    pub request: JobRequest,
    /// Human-readable cause, present only when `status == Failed`.
    pub error: Option<String>,
    pub artifacts: JobArtifacts,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Job pipeline status
///
/// Transitions only move forward through the pipeline; `Failed` is reachable
/// from any non-terminal state. Nothing leaves `Completed` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    GeneratingScript,
    FetchingImages,
    GeneratingAudio,
    RenderingVideo,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this status is terminal (no further transitions).
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Progress value a job takes when it enters this status.
    ///
    /// `Failed` has no entry value: failing freezes progress at whatever the
    /// current stage had reached.
    pub fn entry_progress(self) -> Option<u8> {
        match self {
            JobStatus::Queued => Some(0),
            JobStatus::GeneratingScript => Some(5),
            JobStatus::FetchingImages => Some(30),
            JobStatus::GeneratingAudio => Some(55),
            JobStatus::RenderingVideo => Some(75),
            JobStatus::Completed => Some(100),
            JobStatus::Failed => None,
        }
    }

    /// Progress value at which the next stage begins, used to bound
    /// sub-progress reported within this stage.
    pub fn next_entry_progress(self) -> u8 {
        match self {
            JobStatus::Queued => 5,
            JobStatus::GeneratingScript => 30,
            JobStatus::FetchingImages => 55,
            JobStatus::GeneratingAudio => 75,
            JobStatus::RenderingVideo => 100,
            JobStatus::Completed | JobStatus::Failed => 100,
        }
    }

    /// Whether the pipeline may move from this status to `next`.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == JobStatus::Failed {
            return true;
        }
        matches!(
            (self, next),
            (JobStatus::Queued, JobStatus::GeneratingScript)
                | (JobStatus::GeneratingScript, JobStatus::FetchingImages)
                | (JobStatus::FetchingImages, JobStatus::GeneratingAudio)
                | (JobStatus::GeneratingAudio, JobStatus::RenderingVideo)
                | (JobStatus::RenderingVideo, JobStatus::Completed)
        )
    }
}

/// Creation parameters for a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    /// Topic, question, or full script to turn into a video.
    pub prompt: String,
    /// Target video length in seconds.
    pub duration: u32,
    /// Narration voice identifier (e.g. "en-US-GuyNeural").
    pub voice_id: String,
    pub orientation: Orientation,
    /// Free-form mood tag steering background music and pacing.
    pub mood: String,
}

/// Output frame orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
    Square,
}

impl Orientation {
    /// Output dimensions in pixels (width, height).
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Orientation::Portrait => (1080, 1920),
            Orientation::Landscape => (1920, 1080),
            Orientation::Square => (1080, 1080),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [JobStatus; 7] = [
        JobStatus::Queued,
        JobStatus::GeneratingScript,
        JobStatus::FetchingImages,
        JobStatus::GeneratingAudio,
        JobStatus::RenderingVideo,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    #[test]
    fn test_pipeline_order_is_the_only_forward_path() {
        let pipeline = [
            JobStatus::Queued,
            JobStatus::GeneratingScript,
            JobStatus::FetchingImages,
            JobStatus::GeneratingAudio,
            JobStatus::RenderingVideo,
            JobStatus::Completed,
        ];

        for (i, from) in pipeline.iter().enumerate() {
            for to in ALL {
                let is_successor = pipeline.get(i + 1) == Some(&to);
                let is_failure = to == JobStatus::Failed && !from.is_terminal();
                assert_eq!(
                    from.can_transition_to(to),
                    is_successor || is_failure,
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        for from in [JobStatus::Completed, JobStatus::Failed] {
            for to in ALL {
                assert!(!from.can_transition_to(to), "{:?} -> {:?}", from, to);
            }
        }
    }

    #[test]
    fn test_failed_reachable_from_any_non_terminal_state() {
        for from in ALL {
            assert_eq!(from.can_transition_to(JobStatus::Failed), !from.is_terminal());
        }
    }

    #[test]
    fn test_entry_progress_increases_along_the_pipeline() {
        assert_eq!(JobStatus::Queued.entry_progress(), Some(0));
        assert_eq!(JobStatus::GeneratingScript.entry_progress(), Some(5));
        assert_eq!(JobStatus::FetchingImages.entry_progress(), Some(30));
        assert_eq!(JobStatus::GeneratingAudio.entry_progress(), Some(55));
        assert_eq!(JobStatus::RenderingVideo.entry_progress(), Some(75));
        assert_eq!(JobStatus::Completed.entry_progress(), Some(100));
        assert_eq!(JobStatus::Failed.entry_progress(), None);
    }

    #[test]
    fn test_sub_progress_bands_do_not_overlap() {
        for status in ALL {
            if let Some(entry) = status.entry_progress() {
                assert!(entry <= status.next_entry_progress(), "{:?}", status);
            }
        }
    }

    #[test]
    fn test_status_serializes_as_snake_case() {
        let json = serde_json::to_string(&JobStatus::GeneratingScript).unwrap();
        assert_eq!(json, "\"generating_script\"");

        let status: JobStatus = serde_json::from_str("\"fetching_images\"").unwrap();
        assert_eq!(status, JobStatus::FetchingImages);
    }

    #[test]
    fn test_orientation_dimensions() {
        assert_eq!(Orientation::Landscape.dimensions(), (1920, 1080));
        assert_eq!(Orientation::Portrait.dimensions(), (1080, 1920));
        assert_eq!(Orientation::Square.dimensions(), (1080, 1080));
    }

    #[test]
    fn test_orientation_serializes_lowercase() {
        let json = serde_json::to_string(&Orientation::Portrait).unwrap();
        assert_eq!(json, "\"portrait\"");
    }
}
