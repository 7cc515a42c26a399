//! Server configuration
//!
//! Defines all configurable parameters for the engine including the bind
//! address, artifact output directory, scheduling limits, and auto-dub
//! targets.

use std::path::PathBuf;
use std::time::Duration;

/// Engine configuration
///
/// All intervals and limits are configurable to allow tuning for different
/// deployment scenarios (dev vs prod, CPU-bound vs network-bound stages).
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP API binds to (e.g. "0.0.0.0:8080")
    pub bind_addr: String,

    /// Directory finished artifacts are written to
    pub output_dir: PathBuf,

    /// How often the engine scans the store for queued jobs
    pub poll_interval: Duration,

    /// Max jobs whose pipelines may run concurrently
    pub max_parallel_jobs: usize,

    /// Extra attempts per stage after the first failure (no backoff)
    pub stage_retries: u32,

    /// Auto-dub targets applied to English-voiced jobs
    pub dub_targets: Vec<DubTarget>,
}

/// One auto-dub target: a display language plus the voice used for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DubTarget {
    pub language: String,
    pub voice_id: String,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(bind_addr: String, output_dir: PathBuf) -> Self {
        Self {
            bind_addr,
            output_dir,
            poll_interval: Duration::from_secs(1),
            max_parallel_jobs: 2,
            stage_retries: 1,
            dub_targets: vec![DubTarget {
                language: "Hindi".to_string(),
                voice_id: "hi-IN-SwaraNeural".to_string(),
            }],
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognized environment variables:
    /// - REELFORGE_BIND_ADDR (optional, default: 0.0.0.0:8080)
    /// - REELFORGE_OUTPUT_DIR (optional, default: output)
    /// - POLL_INTERVAL (optional, seconds, default: 1)
    /// - MAX_PARALLEL_JOBS (optional, default: 2)
    /// - STAGE_RETRIES (optional, default: 1)
    /// - DUB_LANGUAGES (optional, comma-separated `language:voice_id` pairs,
    ///   default: `Hindi:hi-IN-SwaraNeural`)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("REELFORGE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let output_dir = std::env::var("REELFORGE_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("output"));

        let mut config = Self::new(bind_addr, output_dir);

        if let Some(secs) = std::env::var("POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.poll_interval = Duration::from_secs(secs);
        }

        if let Some(n) = std::env::var("MAX_PARALLEL_JOBS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            config.max_parallel_jobs = n;
        }

        if let Some(n) = std::env::var("STAGE_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
        {
            config.stage_retries = n;
        }

        if let Ok(spec) = std::env::var("DUB_LANGUAGES") {
            config.dub_targets = parse_dub_targets(&spec)?;
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if self.output_dir.as_os_str().is_empty() {
            anyhow::bail!("output_dir cannot be empty");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.max_parallel_jobs == 0 {
            anyhow::bail!("max_parallel_jobs must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("0.0.0.0:8080".to_string(), PathBuf::from("output"))
    }
}

/// Parses `language:voice_id` pairs out of a comma-separated list.
///
/// An empty string clears all dub targets.
fn parse_dub_targets(spec: &str) -> anyhow::Result<Vec<DubTarget>> {
    let mut targets = Vec::new();

    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (language, voice_id) = entry
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("invalid dub target '{}', expected language:voice_id", entry))?;

        if language.is_empty() || voice_id.is_empty() {
            anyhow::bail!("invalid dub target '{}', expected language:voice_id", entry);
        }

        targets.push(DubTarget {
            language: language.to_string(),
            voice_id: voice_id.to_string(),
        });
    }

    Ok(targets)
}
