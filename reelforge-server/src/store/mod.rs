//! Job Store
//!
//! The single source of truth for job state. All mutation goes through this
//! module and is applied atomically under one write lock, so no caller ever
//! observes a half-updated job. The engine is the only writer after insert;
//! the API handlers only read snapshots.

use std::collections::HashMap;
use std::path::PathBuf;

use reelforge_core::domain::artifact::DubbedVersion;
use reelforge_core::domain::job::{Job, JobRequest, JobStatus};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Store error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(Uuid),
    ValidationError(String),
    InvalidTransition {
        job_id: Uuid,
        from: JobStatus,
        to: JobStatus,
    },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "job {} not found", id),
            StoreError::ValidationError(msg) => write!(f, "{}", msg),
            StoreError::InvalidTransition { job_id, from, to } => write!(
                f,
                "job {} cannot move from {:?} to {:?}",
                job_id, from, to
            ),
        }
    }
}

impl std::error::Error for StoreError {}

/// In-memory job store, safe for concurrent engine/API access.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the request and creates a new queued job.
    ///
    /// Rejected requests leave the store untouched.
    pub async fn insert(&self, request: JobRequest) -> Result<Uuid, StoreError> {
        if request.prompt.trim().is_empty() {
            return Err(StoreError::ValidationError(
                "prompt must not be empty".to_string(),
            ));
        }
        if request.duration == 0 {
            return Err(StoreError::ValidationError(
                "duration must be positive".to_string(),
            ));
        }

        let job = Job {
            id: Uuid::new_v4(),
            status: JobStatus::Queued,
            progress: 0,
            request,
            error: None,
            artifacts: Default::default(),
            created_at: chrono::Utc::now(),
            started_at: None,
            completed_at: None,
        };

        let id = job.id;
        self.jobs.write().await.insert(id, job);

        tracing::info!("Job created: {}", id);

        Ok(id)
    }

    /// Returns a snapshot of a job.
    pub async fn get(&self, id: Uuid) -> Result<Job, StoreError> {
        self.jobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Number of jobs currently held.
    pub async fn count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Claims the oldest queued job for execution, if any.
    ///
    /// The claim moves the job to `GeneratingScript` under the write lock,
    /// so exactly one engine worker can ever own a given job.
    pub async fn claim_next_queued(&self) -> Option<Job> {
        let mut jobs = self.jobs.write().await;

        let next_id = jobs
            .values()
            .filter(|j| j.status == JobStatus::Queued)
            .min_by_key(|j| j.created_at)
            .map(|j| j.id)?;

        let job = jobs.get_mut(&next_id)?;
        job.status = JobStatus::GeneratingScript;
        job.progress = JobStatus::GeneratingScript.entry_progress().unwrap_or(0);
        job.started_at = Some(chrono::Utc::now());

        Some(job.clone())
    }

    /// Moves a job to the next pipeline stage, setting its entry progress.
    pub async fn advance(&self, id: Uuid, next: JobStatus) -> Result<(), StoreError> {
        self.mutate(id, |job| {
            Self::check_transition(job, next)?;
            job.status = next;
            if let Some(entry) = next.entry_progress() {
                job.progress = job.progress.max(entry);
            }
            Ok(())
        })
        .await
    }

    /// Records sub-progress within the current stage.
    ///
    /// Progress is monotonic: values below the current one are ignored
    /// rather than rejected, since stage workers report independently of
    /// what the stage entry already set.
    pub async fn set_progress(&self, id: Uuid, progress: u8) -> Result<(), StoreError> {
        self.mutate(id, |job| {
            if job.status.is_terminal() {
                return Err(StoreError::InvalidTransition {
                    job_id: job.id,
                    from: job.status,
                    to: job.status,
                });
            }
            job.progress = job.progress.max(progress.min(100));
            Ok(())
        })
        .await
    }

    /// Records a dubbed variant produced during the rendering stage.
    pub async fn add_dub(&self, id: Uuid, dub: DubbedVersion) -> Result<(), StoreError> {
        self.mutate(id, |job| {
            if job.status.is_terminal() {
                return Err(StoreError::InvalidTransition {
                    job_id: job.id,
                    from: job.status,
                    to: job.status,
                });
            }
            job.artifacts.dubbed_versions.push(dub);
            Ok(())
        })
        .await
    }

    /// Completes a job, attaching its final artifacts in the same update so
    /// `video_path` is visible exactly when `Completed` is.
    pub async fn complete(
        &self,
        id: Uuid,
        video_path: PathBuf,
        thumbnail_path: PathBuf,
    ) -> Result<(), StoreError> {
        self.mutate(id, |job| {
            Self::check_transition(job, JobStatus::Completed)?;
            job.status = JobStatus::Completed;
            job.progress = 100;
            job.artifacts.video_path = Some(video_path.clone());
            job.artifacts.thumbnail_path = Some(thumbnail_path.clone());
            job.completed_at = Some(chrono::Utc::now());
            Ok(())
        })
        .await
    }

    /// Fails a job with a descriptive cause, freezing its progress.
    pub async fn fail(&self, id: Uuid, error: String) -> Result<(), StoreError> {
        self.mutate(id, |job| {
            Self::check_transition(job, JobStatus::Failed)?;
            job.status = JobStatus::Failed;
            job.error = Some(error.clone());
            job.completed_at = Some(chrono::Utc::now());
            Ok(())
        })
        .await
    }

    /// Applies one atomic mutation under the write lock.
    async fn mutate<F>(&self, id: Uuid, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Job) -> Result<(), StoreError>,
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        f(job)
    }

    fn check_transition(job: &Job, next: JobStatus) -> Result<(), StoreError> {
        if job.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(StoreError::InvalidTransition {
                job_id: job.id,
                from: job.status,
                to: next,
            })
        }
    }
}
