//! Create command handler
//!
//! Submits a new generation job and optionally watches it to completion.

use std::time::Duration;

use anyhow::{Result, bail};
use clap::Args;
use colored::*;
use reelforge_client::EngineClient;
use reelforge_core::domain::job::Orientation;
use reelforge_core::dto::job::CreateJobRequest;

use super::colorize_status;
use crate::config::Config;

/// Arguments for the create command
#[derive(Args)]
pub struct CreateArgs {
    /// Topic prompt for the video
    pub prompt: String,

    /// Target duration in seconds
    #[arg(short, long, default_value_t = 30)]
    pub duration: u32,

    /// Narration voice identifier
    #[arg(long, default_value = "en-US-GuyNeural")]
    pub voice: String,

    /// Video orientation (portrait, landscape, square)
    #[arg(long, default_value = "landscape")]
    pub orientation: String,

    /// Background music mood
    #[arg(long, default_value = "random")]
    pub mood: String,

    /// Poll the job until it completes or fails
    #[arg(short, long)]
    pub watch: bool,
}

/// Handle the create command
pub async fn handle_create_command(args: CreateArgs, config: &Config) -> Result<()> {
    let client = EngineClient::new(&config.server_url);

    let orientation = parse_orientation(&args.orientation)?;

    let request = CreateJobRequest {
        prompt: args.prompt,
        duration: args.duration,
        voice_id: args.voice,
        orientation,
        mood: args.mood,
    };

    let job_id = client.create_job(&request).await?;

    println!("{} Job created", "✓".green());
    println!("  ID: {}", job_id.to_string().cyan());

    if args.watch {
        println!();
        watch_job(&client, job_id).await?;
    } else {
        println!();
        println!(
            "{}",
            format!("Run `reelforge status {}` to track progress.", job_id).dimmed()
        );
    }

    Ok(())
}

/// Poll a job until it reaches a terminal status, printing each change
async fn watch_job(client: &EngineClient, job_id: uuid::Uuid) -> Result<()> {
    let mut last_line = String::new();

    loop {
        let status = client.get_status(job_id).await?;

        let line = format!("{:?} ({}%)", status.status, status.progress);
        if line != last_line {
            println!(
                "  {} {} {}",
                "▸".cyan(),
                colorize_status(status.status),
                format!("{}%", status.progress).dimmed()
            );
            last_line = line;
        }

        if status.status.is_terminal() {
            println!();
            if let Some(error) = &status.error {
                println!("{} Job failed: {}", "✗".red(), error.red());
            } else {
                println!("{} Job completed", "✓".green());
                println!(
                    "{}",
                    format!("Run `reelforge download {}` to fetch the video.", job_id).dimmed()
                );
            }
            return Ok(());
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

/// Parse an orientation name (case-insensitive)
fn parse_orientation(value: &str) -> Result<Orientation> {
    match value.to_lowercase().as_str() {
        "portrait" => Ok(Orientation::Portrait),
        "landscape" => Ok(Orientation::Landscape),
        "square" => Ok(Orientation::Square),
        other => bail!("unknown orientation '{other}' (expected portrait, landscape, or square)"),
    }
}
