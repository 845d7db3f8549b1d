//! Secret command handlers
//!
//! Secrets are submitted as KEY=VALUE pairs; keys are validated server-side
//! before anything is stored.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use flowdeck_client::ApiClient;
use flowdeck_core::domain::secret::SecretInput;

use crate::config::Config;

/// Secret subcommands
#[derive(Subcommand)]
pub enum SecretCommands {
    /// List secret keys for a repository
    List {
        /// Repository full name (owner/name)
        repo: String,
    },
    /// Set one or more secrets
    Set {
        /// Repository full name (owner/name)
        repo: String,

        /// Secrets as KEY=VALUE pairs
        #[arg(required = true, value_parser = parse_key_val)]
        secrets: Vec<(String, String)>,
    },
    /// Delete a secret by key
    Delete {
        /// Repository full name (owner/name)
        repo: String,

        /// Secret key
        key: String,
    },
    /// Bulk-import secrets from a file of KEY=VALUE lines
    Import {
        /// Repository full name (owner/name)
        repo: String,

        /// Path to the file to import
        #[arg(short, long)]
        file: String,
    },
    /// Check whether a key name is acceptable
    Validate {
        /// Secret key
        key: String,
    },
}

/// Parse a single key=value pair
fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Handle secret commands
pub async fn handle_secret_command(command: SecretCommands, config: &Config) -> Result<()> {
    let client = super::authed_client(config)?;

    match command {
        SecretCommands::List { repo } => list_secrets(&client, &repo).await,
        SecretCommands::Set { repo, secrets } => set_secrets(&client, &repo, secrets).await,
        SecretCommands::Delete { repo, key } => delete_secret(&client, &repo, &key).await,
        SecretCommands::Import { repo, file } => import_secrets(&client, &repo, &file).await,
        SecretCommands::Validate { key } => validate_key(&client, &key).await,
    }
}

async fn list_secrets(client: &ApiClient, repo: &str) -> Result<()> {
    let secrets = client.list_secrets(repo).await?;

    if secrets.is_empty() {
        println!("{}", "No secrets stored.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} secret(s):", secrets.len()).bold());
    println!();
    for secret in &secrets {
        println!("  {} {}", "▸".cyan(), secret.key.bold());
        println!(
            "    Updated: {}",
            secret
                .updated_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .dimmed()
        );
    }

    Ok(())
}

async fn set_secrets(
    client: &ApiClient,
    repo: &str,
    secrets: Vec<(String, String)>,
) -> Result<()> {
    // Validate every key before storing anything.
    for (key, _) in &secrets {
        let validation = client.validate_secret_key(key).await?;
        if !validation.is_valid {
            anyhow::bail!("invalid key `{}`: {}", key, validation.message);
        }
    }

    for (key, value) in &secrets {
        client.create_secret(repo, key, value).await?;
        println!("{}", format!("✓ Secret {} saved.", key).green().bold());
    }

    Ok(())
}

async fn delete_secret(client: &ApiClient, repo: &str, key: &str) -> Result<()> {
    client.delete_secret(repo, key).await?;

    println!("{}", format!("✓ Secret {} deleted.", key).green().bold());

    Ok(())
}

async fn import_secrets(client: &ApiClient, repo: &str, file: &str) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read secrets file: {}", file))?;

    let mut secrets = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = parse_key_val(line)?;
        secrets.push(SecretInput { key, value });
    }

    if secrets.is_empty() {
        println!("{}", "Nothing to import.".yellow());
        return Ok(());
    }

    let count = secrets.len();
    client.bulk_update_secrets(repo, secrets).await?;

    println!(
        "{}",
        format!("✓ Imported {} secret(s) into {}!", count, repo)
            .green()
            .bold()
    );

    Ok(())
}

async fn validate_key(client: &ApiClient, key: &str) -> Result<()> {
    let validation = client.validate_secret_key(key).await?;

    if validation.is_valid {
        println!("  {} {}", "✓".green(), format!("`{}` is a valid key", key));
    } else {
        println!("  {} {}", "✗".red(), validation.message);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_pairs() {
        assert_eq!(
            parse_key_val("API_KEY=abc=123").unwrap(),
            ("API_KEY".to_string(), "abc=123".to_string())
        );
        assert!(parse_key_val("NO_EQUALS").is_err());
    }
}
