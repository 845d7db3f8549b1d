//! Activity feed command
//!
//! Renders the recent-activity feed with one line shape per variant.

use anyhow::Result;
use clap::Args;
use colored::*;
use flowdeck_core::domain::activity::{Activity, ActivityDetail, ActivityStatus};

use crate::config::Config;

/// Activity arguments
#[derive(Args)]
pub struct ActivityArgs {
    /// Maximum number of entries
    #[arg(short, long, default_value = "10")]
    limit: usize,
}

/// Handle the activity command
pub async fn handle_activity_command(args: ActivityArgs, config: &Config) -> Result<()> {
    let client = super::authed_client(config)?;
    let activities = client.recent_activities(args.limit).await?;

    if activities.is_empty() {
        println!("{}", "No recent activity.".yellow());
        return Ok(());
    }

    for activity in &activities {
        print_activity(activity);
    }

    Ok(())
}

fn print_activity(activity: &Activity) {
    let when = activity.timestamp.format("%Y-%m-%d %H:%M:%S");
    println!(
        "  {} {} {} {}",
        status_glyph(activity.status),
        when.to_string().dimmed(),
        activity.repository.full_name.bold(),
        describe(&activity.detail)
    );

    if let ActivityDetail::Push {
        commit: Some(commit),
        ..
    } = &activity.detail
    {
        let short = commit.id.get(..7).unwrap_or(&commit.id);
        println!(
            "      {} {} {}",
            short.cyan(),
            commit.message.lines().next().unwrap_or(""),
            format!("by {}", commit.author.name).dimmed()
        );
    }
}

fn describe(detail: &ActivityDetail) -> ColoredString {
    match detail {
        ActivityDetail::Push { .. } => "push".normal(),
        ActivityDetail::WebhookSetup {} => "webhook setup".normal(),
        ActivityDetail::PipelineExecution { .. } => "pipeline execution".normal(),
    }
}

fn status_glyph(status: ActivityStatus) -> ColoredString {
    match status {
        ActivityStatus::Success => "✓".green(),
        ActivityStatus::Failed => "✗".red(),
        ActivityStatus::InProgress => "▸".yellow(),
    }
}
