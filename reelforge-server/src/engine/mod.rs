//! Job Engine
//!
//! Runs the ordered pipeline {script -> images -> audio -> render} for
//! queued jobs, publishing status and progress through the job store after
//! each step. Jobs are claimed FIFO; each claimed job runs in its own task
//! guarded by a semaphore permit, so pipelines for different jobs proceed
//! independently while stages within one job stay strictly sequential.

pub mod stages;

use std::sync::Arc;

use reelforge_core::domain::artifact::DubbedVersion;
use reelforge_core::domain::job::{Job, JobStatus};
use tokio::sync::Semaphore;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::config::{Config, DubTarget};
use crate::engine::stages::{MediaClip, RenderSpec, Script, StageSet, VoiceTrack};
use crate::store::{JobStore, StoreError};

/// Job engine that continuously picks up and processes queued jobs
pub struct Engine {
    config: Config,
    store: Arc<JobStore>,
    stages: StageSet,
    semaphore: Arc<Semaphore>,
}

impl Engine {
    /// Creates a new engine
    pub fn new(config: Config, store: Arc<JobStore>, stages: StageSet) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_parallel_jobs));
        Self {
            config,
            store,
            stages,
            semaphore,
        }
    }

    /// Starts the pickup loop
    pub async fn run(&self) {
        info!(
            "Starting job engine (poll interval: {:?}, max parallel jobs: {})",
            self.config.poll_interval, self.config.max_parallel_jobs
        );

        let mut interval = time::interval(self.config.poll_interval);

        loop {
            interval.tick().await;

            loop {
                // Acquire capacity before claiming so a claimed job is never
                // left waiting on a permit.
                let Ok(permit) = self.semaphore.clone().try_acquire_owned() else {
                    debug!("Max parallel jobs reached, deferring pickup");
                    break;
                };

                let Some(job) = self.store.claim_next_queued().await else {
                    break;
                };

                self.spawn_pipeline(job, permit);
            }
        }
    }

    /// Spawns a task that runs one job's pipeline to a terminal state
    fn spawn_pipeline(&self, job: Job, permit: tokio::sync::OwnedSemaphorePermit) {
        let store = Arc::clone(&self.store);
        let stages = self.stages.clone();
        let config = self.config.clone();

        tokio::spawn(async move {
            let job_id = job.id;
            if let Err(e) = Self::process_job(job, config, store, stages).await {
                error!("Job {} pipeline aborted on store error: {}", job_id, e);
            }
            drop(permit);
        });
    }

    /// Runs the full pipeline for one claimed job.
    ///
    /// Stage failures are recorded into the job (never returned); the error
    /// path here is reserved for store-level faults.
    pub(crate) async fn process_job(
        job: Job,
        config: Config,
        store: Arc<JobStore>,
        stages: StageSet,
    ) -> Result<(), StoreError> {
        let id = job.id;
        let request = &job.request;

        info!(
            "Job {} started: {} ({}s, {:?}, {})",
            id, request.prompt, request.duration, request.orientation, request.mood
        );

        // 1. Write the script (the claim already moved the job to
        //    GeneratingScript).
        let script = match run_stage(config.stage_retries, "script", || {
            stages.script.write(request)
        })
        .await
        {
            Ok(script) => script,
            Err(cause) => return fail_job(&store, id, cause).await,
        };

        // 2. Fetch footage per segment, reporting sub-progress.
        store.advance(id, JobStatus::FetchingImages).await?;
        let total = script.segments.len();
        let mut media = Vec::with_capacity(total);
        for (done, segment) in script.segments.iter().enumerate() {
            let clip = match run_stage(config.stage_retries, "media", || {
                stages.media.fetch(&segment.image_query, request.orientation)
            })
            .await
            {
                Ok(clip) => clip,
                Err(cause) => return fail_job(&store, id, cause).await,
            };
            media.push(clip);
            store
                .set_progress(id, sub_progress(JobStatus::FetchingImages, done + 1, total))
                .await?;
        }

        // 3. Synthesize narration per segment.
        store.advance(id, JobStatus::GeneratingAudio).await?;
        let mut voices = Vec::with_capacity(total);
        for (done, segment) in script.segments.iter().enumerate() {
            let track = match run_stage(config.stage_retries, "audio", || {
                stages.voice.synthesize(&segment.text, &request.voice_id)
            })
            .await
            {
                Ok(track) => track,
                Err(cause) => return fail_job(&store, id, cause).await,
            };
            voices.push(track);
            store
                .set_progress(id, sub_progress(JobStatus::GeneratingAudio, done + 1, total))
                .await?;
        }

        // 4. Render the primary video and its thumbnail.
        store.advance(id, JobStatus::RenderingVideo).await?;
        let spec = RenderSpec {
            output_stem: id.to_string(),
            orientation: request.orientation,
            mood: request.mood.clone(),
        };
        let video_path = match run_stage(config.stage_retries, "render", || {
            stages.renderer.render(&spec, &script, &media, &voices)
        })
        .await
        {
            Ok(path) => path,
            Err(cause) => return fail_job(&store, id, cause).await,
        };
        let thumbnail_path = match run_stage(config.stage_retries, "render", || {
            stages.renderer.thumbnail(&video_path, &request.prompt)
        })
        .await
        {
            Ok(path) => path,
            Err(cause) => return fail_job(&store, id, cause).await,
        };

        // 5. Best-effort auto-dubbing for English-voiced jobs. A dub failure
        //    never fails the job.
        if request.voice_id.starts_with("en-") {
            for target in &config.dub_targets {
                if target.voice_id == request.voice_id {
                    continue;
                }
                match render_dub(&job, &stages, &script, &media, target).await {
                    Ok(dub) => {
                        info!("Job {}: dubbed to {}", id, dub.language);
                        store.add_dub(id, dub).await?;
                    }
                    Err(e) => {
                        warn!("Job {}: dubbing to {} failed: {:#}", id, target.language, e);
                    }
                }
            }
        }

        store.complete(id, video_path, thumbnail_path).await?;
        info!("Job {} completed", id);

        Ok(())
    }
}

/// Translates, re-voices, and re-renders the job for one dub target,
/// keeping the original footage.
async fn render_dub(
    job: &Job,
    stages: &StageSet,
    script: &Script,
    media: &[MediaClip],
    target: &DubTarget,
) -> anyhow::Result<DubbedVersion> {
    let dub_script = stages.script.translate(script, &target.language).await?;

    let mut voices: Vec<VoiceTrack> = Vec::with_capacity(dub_script.segments.len());
    for segment in &dub_script.segments {
        voices.push(
            stages
                .voice
                .synthesize(&segment.text, &target.voice_id)
                .await?,
        );
    }

    let spec = RenderSpec {
        output_stem: format!("{}_{}", job.id, target.language.to_lowercase()),
        orientation: job.request.orientation,
        mood: job.request.mood.clone(),
    };
    let path = stages.renderer.render(&spec, &dub_script, media, &voices).await?;

    Ok(DubbedVersion {
        language: target.language.clone(),
        path,
    })
}

/// Runs one stage attempt with the configured retry budget (no backoff).
///
/// Returns the failure cause once the budget is exhausted; callers record
/// it into the job rather than propagating it.
async fn run_stage<T, F, Fut>(retries: u32, stage: &str, f: F) -> Result<T, String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let attempts = retries + 1;
    let mut last_error = None;

    for attempt in 1..=attempts {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt < attempts {
                    warn!("{} stage attempt {}/{} failed: {:#}", stage, attempt, attempts, e);
                }
                last_error = Some(e);
            }
        }
    }

    Err(format!(
        "{} stage failed after {} attempt(s): {:#}",
        stage,
        attempts,
        last_error.expect("at least one attempt ran")
    ))
}

/// Marks the job failed with the stage's cause, leaving progress frozen.
async fn fail_job(store: &JobStore, id: uuid::Uuid, cause: String) -> Result<(), StoreError> {
    error!("Job {} failed: {}", id, cause);
    store.fail(id, cause).await
}

/// Maps completed work within a stage into that stage's progress band.
fn sub_progress(stage: JobStatus, done: usize, total: usize) -> u8 {
    let entry = stage.entry_progress().unwrap_or(0) as usize;
    let band = stage.next_entry_progress() as usize - entry;
    (entry + band * done / total.max(1)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::stages::{
        LocalScriptWriter, MediaFetcher, ScriptWriter, StageSet, VoiceSynthesizer,
    };
    use async_trait::async_trait;
    use reelforge_core::domain::job::{JobRequest, Orientation};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn test_config(name: &str) -> Config {
        let output_dir =
            std::env::temp_dir().join(format!("reelforge-engine-{}-{}", name, uuid::Uuid::new_v4()));
        Config::new("127.0.0.1:0".to_string(), output_dir)
    }

    fn request(voice_id: &str) -> JobRequest {
        JobRequest {
            prompt: "cats playing".to_string(),
            duration: 30,
            voice_id: voice_id.to_string(),
            orientation: Orientation::Landscape,
            mood: "fun".to_string(),
        }
    }

    async fn claimed_job(store: &JobStore, req: JobRequest) -> Job {
        store.insert(req).await.unwrap();
        store.claim_next_queued().await.unwrap()
    }

    /// Media fetcher that fails a fixed number of times before recovering.
    struct FlakyMediaFetcher {
        failures_left: AtomicU32,
        inner: stages::LocalMediaFetcher,
    }

    impl FlakyMediaFetcher {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: AtomicU32::new(failures),
                inner: stages::LocalMediaFetcher::new(),
            }
        }
    }

    #[async_trait]
    impl MediaFetcher for FlakyMediaFetcher {
        async fn fetch(&self, query: &str, orientation: Orientation) -> anyhow::Result<MediaClip> {
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                anyhow::bail!("stock footage backend unreachable");
            }
            self.inner.fetch(query, orientation).await
        }
    }

    /// Script writer whose translation step always fails.
    struct UntranslatableScriptWriter {
        inner: LocalScriptWriter,
    }

    #[async_trait]
    impl ScriptWriter for UntranslatableScriptWriter {
        async fn write(&self, request: &JobRequest) -> anyhow::Result<Script> {
            self.inner.write(request).await
        }

        async fn translate(&self, _script: &Script, language: &str) -> anyhow::Result<Script> {
            anyhow::bail!("translation to {} unavailable", language)
        }
    }

    /// Voice synthesizer that counts invocations.
    struct CountingVoice {
        calls: Arc<AtomicU32>,
        inner: stages::LocalVoiceSynthesizer,
    }

    #[async_trait]
    impl VoiceSynthesizer for CountingVoice {
        async fn synthesize(&self, text: &str, voice_id: &str) -> anyhow::Result<VoiceTrack> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.synthesize(text, voice_id).await
        }
    }

    #[tokio::test]
    async fn test_pipeline_runs_to_completion_with_artifacts() {
        let config = test_config("happy");
        let store = Arc::new(JobStore::new());
        let stages = StageSet::local(&config.output_dir);

        let job = claimed_job(&store, request("en-US-GuyNeural")).await;
        let id = job.id;

        Engine::process_job(job, config.clone(), Arc::clone(&store), stages)
            .await
            .unwrap();

        let job = store.get(id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert!(job.error.is_none());

        let video_path = job.artifacts.video_path.clone().expect("video path set");
        let bytes = tokio::fs::read(&video_path).await.unwrap();
        assert!(!bytes.is_empty());
        assert!(job.artifacts.thumbnail_path.is_some());

        // English-voiced jobs get the default Hindi dub.
        assert_eq!(job.artifacts.dub_languages(), vec!["Hindi".to_string()]);
        let dub_path = &job.artifacts.dubbed_versions[0].path;
        assert!(!tokio::fs::read(dub_path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_english_jobs_are_not_dubbed() {
        let config = test_config("nodub");
        let store = Arc::new(JobStore::new());
        let stages = StageSet::local(&config.output_dir);

        let job = claimed_job(&store, request("hi-IN-SwaraNeural")).await;
        let id = job.id;

        Engine::process_job(job, config, Arc::clone(&store), stages)
            .await
            .unwrap();

        let job = store.get(id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.artifacts.dubbed_versions.is_empty());
    }

    #[tokio::test]
    async fn test_media_stage_exhausting_retries_fails_the_job() {
        let config = test_config("failing");
        let store = Arc::new(JobStore::new());
        let mut stages = StageSet::local(&config.output_dir);
        // Default policy is 1 retry, so two failures exhaust the budget.
        stages.media = Arc::new(FlakyMediaFetcher::new(2));

        let job = claimed_job(&store, request("en-US-GuyNeural")).await;
        let id = job.id;

        Engine::process_job(job, config, Arc::clone(&store), stages)
            .await
            .unwrap();

        let job = store.get(id).await.unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        // Progress frozen at the value set when fetching_images began.
        assert_eq!(job.progress, 30);
        let error = job.error.expect("failure cause recorded");
        assert!(error.contains("media stage"), "unexpected cause: {}", error);
        assert!(job.artifacts.video_path.is_none());
    }

    #[tokio::test]
    async fn test_single_media_failure_is_absorbed_by_the_retry() {
        let config = test_config("flaky");
        let store = Arc::new(JobStore::new());
        let mut stages = StageSet::local(&config.output_dir);
        stages.media = Arc::new(FlakyMediaFetcher::new(1));

        let job = claimed_job(&store, request("en-US-GuyNeural")).await;
        let id = job.id;

        Engine::process_job(job, config, Arc::clone(&store), stages)
            .await
            .unwrap();

        assert_eq!(store.get(id).await.unwrap().status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn test_zero_retries_fails_on_first_error() {
        let mut config = test_config("noretry");
        config.stage_retries = 0;
        let store = Arc::new(JobStore::new());
        let mut stages = StageSet::local(&config.output_dir);
        stages.media = Arc::new(FlakyMediaFetcher::new(1));

        let job = claimed_job(&store, request("en-US-GuyNeural")).await;
        let id = job.id;

        Engine::process_job(job, config, Arc::clone(&store), stages)
            .await
            .unwrap();

        assert_eq!(store.get(id).await.unwrap().status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_dub_failure_does_not_fail_the_job() {
        let config = test_config("dubfail");
        let store = Arc::new(JobStore::new());
        let mut stages = StageSet::local(&config.output_dir);
        stages.script = Arc::new(UntranslatableScriptWriter {
            inner: LocalScriptWriter::new(),
        });

        let job = claimed_job(&store, request("en-US-GuyNeural")).await;
        let id = job.id;

        Engine::process_job(job, config, Arc::clone(&store), stages)
            .await
            .unwrap();

        let job = store.get(id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.artifacts.dubbed_versions.is_empty());
        assert!(job.artifacts.video_path.is_some());
    }

    #[tokio::test]
    async fn test_audio_runs_once_per_segment() {
        let config = test_config("counting");
        let store = Arc::new(JobStore::new());
        let calls = Arc::new(AtomicU32::new(0));
        let mut stages = StageSet::local(&config.output_dir);
        stages.voice = Arc::new(CountingVoice {
            calls: Arc::clone(&calls),
            inner: stages::LocalVoiceSynthesizer::new(),
        });

        // Non-English voice so no dub inflates the count.
        let job = claimed_job(&store, request("fr-FR-HenriNeural")).await;

        Engine::process_job(job, config, store, stages).await.unwrap();

        // 30s at 6s per segment = 5 segments.
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_sub_progress_stays_within_the_stage_band() {
        assert_eq!(sub_progress(JobStatus::FetchingImages, 0, 5), 30);
        assert_eq!(sub_progress(JobStatus::FetchingImages, 5, 5), 55);
        assert_eq!(sub_progress(JobStatus::GeneratingAudio, 1, 2), 65);

        let mut last = 30;
        for done in 0..=5 {
            let p = sub_progress(JobStatus::FetchingImages, done, 5);
            assert!(p >= last);
            last = p;
        }
    }
}
