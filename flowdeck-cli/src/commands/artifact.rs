//! Artifact command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use flowdeck_core::domain::artifact::format_size;

use crate::config::Config;

/// Artifact subcommands
#[derive(Subcommand)]
pub enum ArtifactCommands {
    /// List artifacts stored for an execution
    List {
        /// Execution ID
        execution_id: String,
    },
    /// Print a short-lived download URL for one artifact file
    Url {
        /// Execution ID
        execution_id: String,

        /// Step that produced the artifact
        step: String,

        /// Artifact file name
        file: String,
    },
}

/// Handle artifact commands
pub async fn handle_artifact_command(command: ArtifactCommands, config: &Config) -> Result<()> {
    let client = super::authed_client(config)?;

    match command {
        ArtifactCommands::List { execution_id } => {
            let artifacts = client.list_artifacts(&execution_id.into()).await?;

            if artifacts.is_empty() {
                println!("{}", "No artifacts found.".yellow());
                return Ok(());
            }

            println!("{}", format!("Found {} artifact(s):", artifacts.len()).bold());
            println!();
            for artifact in &artifacts {
                println!(
                    "  {} {} {}",
                    "▸".cyan(),
                    artifact.file_name.bold(),
                    format_size(artifact.size).dimmed()
                );
                println!(
                    "    Step: {} · {}",
                    artifact.step_name,
                    artifact
                        .last_modified
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string()
                        .dimmed()
                );
            }
            Ok(())
        }
        ArtifactCommands::Url {
            execution_id,
            step,
            file,
        } => {
            let url = client
                .artifact_download_url(&execution_id.into(), &step, &file)
                .await?;

            // Plain output so the URL can be piped to curl or a browser.
            println!("{}", url);
            Ok(())
        }
    }
}
