//! Status command handler

use anyhow::Result;
use clap::Args;
use colored::*;
use reelforge_client::EngineClient;
use uuid::Uuid;

use super::colorize_status;
use crate::config::Config;

/// Arguments for the status command
#[derive(Args)]
pub struct StatusArgs {
    /// Job ID
    pub job_id: Uuid,
}

/// Handle the status command
pub async fn handle_status_command(args: StatusArgs, config: &Config) -> Result<()> {
    let client = EngineClient::new(&config.server_url);

    let status = client.get_status(args.job_id).await?;

    println!("{}", "Job Status:".bold());
    println!("  ID:       {}", status.job_id.to_string().cyan());
    println!("  Status:   {}", colorize_status(status.status));
    println!("  Progress: {}%", status.progress);

    if let Some(error) = &status.error {
        println!("  Error:    {}", error.red());
    }

    println!("\n{}", "Artifacts:".bold());
    println!("  Video:     {}", availability(status.artifacts.video));
    println!("  Thumbnail: {}", availability(status.artifacts.thumbnail));

    if status.artifacts.dubbed_versions.is_empty() {
        println!("  Dubs:      {}", "none".dimmed());
    } else {
        println!("  Dubs:      {}", status.artifacts.dubbed_versions.join(", "));
    }

    Ok(())
}

fn availability(present: bool) -> colored::ColoredString {
    if present {
        "available".green()
    } else {
        "not available".dimmed()
    }
}
