//! Download command handler
//!
//! Fetches completed artifacts (video, thumbnail, or a dubbed variant)
//! and writes them to disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use reelforge_client::EngineClient;
use uuid::Uuid;

use crate::config::Config;

/// Arguments for the download command
#[derive(Args)]
pub struct DownloadArgs {
    /// Job ID
    pub job_id: Uuid,

    /// Download the thumbnail instead of the video
    #[arg(long, conflicts_with = "dub")]
    pub thumbnail: bool,

    /// Download the dubbed variant for a language
    #[arg(long)]
    pub dub: Option<String>,

    /// Output file path (defaults to a name derived from the job ID)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the download command
pub async fn handle_download_command(args: DownloadArgs, config: &Config) -> Result<()> {
    let client = EngineClient::new(&config.server_url);

    let (bytes, default_name) = if args.thumbnail {
        let bytes = client.download_thumbnail(args.job_id).await?;
        (bytes, format!("{}.jpg", args.job_id))
    } else if let Some(language) = &args.dub {
        let bytes = client.download_dub(args.job_id, language).await?;
        (bytes, format!("{}_{}.mp4", args.job_id, language.to_lowercase()))
    } else {
        let bytes = client.download_video(args.job_id).await?;
        (bytes, format!("{}.mp4", args.job_id))
    };

    let path = args.output.unwrap_or_else(|| PathBuf::from(default_name));

    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "{} Saved {} ({} bytes)",
        "✓".green(),
        path.display().to_string().cyan(),
        bytes.len()
    );

    Ok(())
}
