//! Flowdeck CLI
//!
//! Command-line interface for the Flowdeck CI/CD backend: repositories,
//! pipeline executions, live log streaming, artifacts and secrets.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flowdeck")]
#[command(about = "Flowdeck CI/CD Pipeline CLI", long_about = None)]
struct Cli {
    /// Backend API URL
    #[arg(long, env = "FLOWDECK_API_URL", default_value = "http://localhost:3001")]
    api_url: String,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config {
        api_url: cli.api_url,
    };

    handle_command(cli.command, &config).await
}
