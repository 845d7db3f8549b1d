//! Auth command handlers
//!
//! Login stores the session token issued at the end of the GitHub OAuth
//! redirect; logout removes it; whoami validates it against the backend.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use flowdeck_client::ApiClient;

use crate::config::{self, Config};

/// Auth subcommands
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store a session token, or print the OAuth entry URL
    Login {
        /// Session token from the OAuth redirect
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Remove the stored session token
    Logout,
    /// Show the GitHub identity behind the stored token
    Whoami,
}

/// Handle auth commands
pub async fn handle_auth_command(command: AuthCommands, config: &Config) -> Result<()> {
    match command {
        AuthCommands::Login { token } => login(config, token).await,
        AuthCommands::Logout => logout(),
        AuthCommands::Whoami => whoami(config).await,
    }
}

async fn login(config: &Config, token: Option<String>) -> Result<()> {
    let client = ApiClient::new(&config.api_url);

    let Some(token) = token else {
        println!("{}", "Open this URL in a browser to sign in:".bold());
        println!("  {}", client.oauth_url().cyan());
        println!();
        println!("After the redirect, copy the token from the URL and run:");
        println!("  {}", "flowdeck auth login --token <TOKEN>".dimmed());
        return Ok(());
    };

    // Validate before persisting so a bad paste fails loudly.
    let user = client.clone().with_token(token.clone()).user_info().await?;

    let path = config::save_token(&token)?;
    println!(
        "{}",
        format!("✓ Logged in as {}", user.login).green().bold()
    );
    println!("  Token stored at {}", path.display().to_string().dimmed());

    Ok(())
}

fn logout() -> Result<()> {
    if config::delete_token()? {
        println!("{}", "✓ Logged out.".green().bold());
    } else {
        println!("{}", "No stored session.".yellow());
    }
    Ok(())
}

async fn whoami(config: &Config) -> Result<()> {
    let client = super::authed_client(config)?;
    let user = client.user_info().await?;

    println!("  {} {}", "▸".cyan(), user.login.bold());
    if let Some(name) = &user.name {
        println!("    Name:      {}", name);
    }
    if let Some(email) = &user.email {
        println!("    Email:     {}", email.dimmed());
    }
    println!("    Repos:     {}", user.public_repos);
    println!(
        "    Followers: {}",
        format!("{} / following {}", user.followers, user.following).dimmed()
    );

    Ok(())
}
