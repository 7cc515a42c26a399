//! Artifact domain types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Files produced by a job, filled in as stages complete.
///
/// `video_path` and `thumbnail_path` are set if and only if the job reached
/// `Completed`; dubbed variants may appear slightly earlier since they are
/// produced during the rendering stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobArtifacts {
    pub video_path: Option<PathBuf>,
    pub thumbnail_path: Option<PathBuf>,
    pub dubbed_versions: Vec<DubbedVersion>,
}

/// A localized variant of the primary video in another language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DubbedVersion {
    pub language: String,
    pub path: PathBuf,
}

impl JobArtifacts {
    /// Look up a dubbed variant by language, case-insensitively.
    pub fn dub(&self, language: &str) -> Option<&DubbedVersion> {
        self.dubbed_versions
            .iter()
            .find(|d| d.language.eq_ignore_ascii_case(language))
    }

    /// Languages of all available dubbed variants.
    pub fn dub_languages(&self) -> Vec<String> {
        self.dubbed_versions
            .iter()
            .map(|d| d.language.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dub_lookup_is_case_insensitive() {
        let artifacts = JobArtifacts {
            video_path: None,
            thumbnail_path: None,
            dubbed_versions: vec![DubbedVersion {
                language: "Hindi".to_string(),
                path: PathBuf::from("job_hi.mp4"),
            }],
        };

        assert!(artifacts.dub("hindi").is_some());
        assert!(artifacts.dub("HINDI").is_some());
        assert!(artifacts.dub("spanish").is_none());
    }
}
