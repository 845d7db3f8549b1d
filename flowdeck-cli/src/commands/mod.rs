//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod activity;
mod artifact;
mod auth;
mod execution;
mod repo;
mod secret;

pub use activity::ActivityArgs;
pub use artifact::ArtifactCommands;
pub use auth::AuthCommands;
pub use execution::ExecCommands;
pub use repo::RepoCommands;
pub use secret::SecretCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Session management
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Repository management
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },
    /// Recent account activity
    Activity(ActivityArgs),
    /// Pipeline executions
    Exec {
        #[command(subcommand)]
        command: ExecCommands,
    },
    /// Build artifacts
    Artifact {
        #[command(subcommand)]
        command: ArtifactCommands,
    },
    /// Repository secrets
    Secret {
        #[command(subcommand)]
        command: SecretCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Auth { command } => auth::handle_auth_command(command, config).await,
        Commands::Repo { command } => repo::handle_repo_command(command, config).await,
        Commands::Activity(args) => activity::handle_activity_command(args, config).await,
        Commands::Exec { command } => execution::handle_exec_command(command, config).await,
        Commands::Artifact { command } => artifact::handle_artifact_command(command, config).await,
        Commands::Secret { command } => secret::handle_secret_command(command, config).await,
    }
}

/// Build an authenticated API client from the stored token.
pub(crate) fn authed_client(config: &Config) -> Result<flowdeck_client::ApiClient> {
    let token = crate::config::require_token()?;
    Ok(flowdeck_client::ApiClient::new(&config.api_url).with_token(token))
}
