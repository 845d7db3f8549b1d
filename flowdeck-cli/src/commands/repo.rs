//! Repository command handlers
//!
//! Lists repositories with their webhook wiring and installs webhooks.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use flowdeck_core::domain::repository::Repository;

use crate::config::Config;

/// Repository subcommands
#[derive(Subcommand)]
pub enum RepoCommands {
    /// List repositories with webhook status
    List,
    /// Install the pipeline webhook on a repository
    SetupWebhook {
        /// Repository full name (owner/name)
        full_name: String,
    },
    /// Check whether the pipeline webhook is installed
    WebhookStatus {
        /// Repository full name (owner/name)
        full_name: String,
    },
}

/// Handle repository commands
pub async fn handle_repo_command(command: RepoCommands, config: &Config) -> Result<()> {
    let client = super::authed_client(config)?;

    match command {
        RepoCommands::List => list_repositories(&client).await,
        RepoCommands::SetupWebhook { full_name } => setup_webhook(&client, &full_name).await,
        RepoCommands::WebhookStatus { full_name } => webhook_status(&client, &full_name).await,
    }
}

async fn list_repositories(client: &flowdeck_client::ApiClient) -> Result<()> {
    let repositories = client.list_repositories().await?;

    if repositories.is_empty() {
        println!("{}", "No repositories found.".yellow());
        return Ok(());
    }

    let names: Vec<String> = repositories.iter().map(|r| r.full_name.clone()).collect();
    let webhooks = client.webhook_statuses(&names).await?;

    println!(
        "{}",
        format!("Found {} repository(ies):", repositories.len()).bold()
    );
    println!();
    for repo in &repositories {
        let connected = webhooks.get(&repo.full_name).copied().unwrap_or(false);
        print_repo_summary(repo, connected);
    }

    Ok(())
}

async fn setup_webhook(client: &flowdeck_client::ApiClient, full_name: &str) -> Result<()> {
    client.setup_webhook(full_name).await?;

    println!(
        "{}",
        format!("✓ Webhook installed on {}!", full_name)
            .green()
            .bold()
    );

    Ok(())
}

async fn webhook_status(client: &flowdeck_client::ApiClient, full_name: &str) -> Result<()> {
    let connected = client.webhook_status(full_name).await?;

    if connected {
        println!("  {} {}", full_name.bold(), "webhook connected".green());
    } else {
        println!("  {} {}", full_name.bold(), "no webhook".yellow());
    }

    Ok(())
}

fn print_repo_summary(repo: &Repository, connected: bool) {
    let badge = if connected {
        "✓ webhook".green()
    } else {
        "– no webhook".dimmed()
    };
    let visibility = if repo.private { "private" } else { "public" };

    println!("  {} {} {}", "▸".cyan(), repo.full_name.bold(), badge);
    if let Some(desc) = &repo.description {
        println!("    {}", desc.dimmed());
    }
    println!(
        "    {} · ★ {} · {}",
        repo.language.as_deref().unwrap_or("n/a"),
        repo.stargazers_count,
        format!("updated {}", repo.updated_at.format("%Y-%m-%d")).dimmed()
    );
    println!();
}
