//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod create;
mod download;
mod status;

pub use create::CreateArgs;
pub use download::DownloadArgs;
pub use status::StatusArgs;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use reelforge_core::domain::job::JobStatus;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a new video generation job
    Create(CreateArgs),
    /// Show the status of a job
    Status(StatusArgs),
    /// Download artifacts of a completed job
    Download(DownloadArgs),
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Create(args) => create::handle_create_command(args, config).await,
        Commands::Status(args) => status::handle_status_command(args, config).await,
        Commands::Download(args) => download::handle_download_command(args, config).await,
    }
}

/// Colorize job status for display
pub(crate) fn colorize_status(status: JobStatus) -> colored::ColoredString {
    let status_str = format!("{:?}", status);
    match status {
        JobStatus::Queued => status_str.yellow(),
        JobStatus::GeneratingScript
        | JobStatus::FetchingImages
        | JobStatus::GeneratingAudio
        | JobStatus::RenderingVideo => status_str.cyan(),
        JobStatus::Completed => status_str.green(),
        JobStatus::Failed => status_str.red(),
    }
}
