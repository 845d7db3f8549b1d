//! Execution command handlers
//!
//! Listing, stored logs, static DAG rendering, the live watch loop and the
//! cancel/rerun control calls.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use flowdeck_client::{ApiClient, ChannelEvent, EventChannel};
use flowdeck_core::domain::execution::{ExecutionStats, PipelineExecution};
use flowdeck_core::domain::graph::GraphShape;
use flowdeck_core::domain::status::{ExecutionId, RunState};
use flowdeck_core::dto::events::InboundEvent;
use flowdeck_core::live::{GraphView, LiveExecution};

use crate::config::Config;
use crate::render;

/// Execution subcommands
#[derive(Subcommand)]
pub enum ExecCommands {
    /// List executions
    List {
        /// Filter by repository full name
        #[arg(short, long)]
        repo: Option<String>,

        /// Maximum number of rows
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show stored logs for an execution
    Logs {
        /// Execution ID
        execution_id: String,
    },
    /// Render the pipeline graph
    Dag {
        /// Execution ID
        execution_id: String,
    },
    /// Follow an execution live
    Watch {
        /// Execution ID
        execution_id: String,
    },
    /// Cancel a queued or running execution
    Cancel {
        /// Execution ID
        execution_id: String,
    },
    /// Re-run an execution
    Rerun {
        /// Execution ID
        execution_id: String,

        /// Watch the new execution after triggering it
        #[arg(short, long)]
        watch: bool,
    },
}

/// Handle execution commands
pub async fn handle_exec_command(command: ExecCommands, config: &Config) -> Result<()> {
    let client = super::authed_client(config)?;

    match command {
        ExecCommands::List { repo, limit } => list_executions(&client, repo.as_deref(), limit).await,
        ExecCommands::Logs { execution_id } => show_logs(&client, &execution_id.into()).await,
        ExecCommands::Dag { execution_id } => show_dag(&client, &execution_id.into()).await,
        ExecCommands::Watch { execution_id } => watch(&client, execution_id.into()).await,
        ExecCommands::Cancel { execution_id } => cancel(&client, &execution_id.into()).await,
        ExecCommands::Rerun {
            execution_id,
            watch: follow,
        } => rerun(&client, &execution_id.into(), follow).await,
    }
}

async fn list_executions(client: &ApiClient, repo: Option<&str>, limit: usize) -> Result<()> {
    let page = client.list_executions(repo, limit).await?;

    if page.executions.is_empty() {
        println!("{}", "No executions found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} execution(s):", page.executions.len()).bold()
    );
    println!();
    for execution in &page.executions {
        print_execution_summary(execution);
    }
    if let Some(stats) = &page.stats {
        print_stats(stats);
    }

    Ok(())
}

fn print_execution_summary(execution: &PipelineExecution) {
    println!(
        "  {} {} {}",
        "▸".cyan(),
        execution.execution_id.as_str().bold(),
        render::execution_state(execution.status)
    );
    println!(
        "    {} {}",
        execution.repo_name,
        execution
            .branch
            .as_deref()
            .map(|b| format!("({})", b))
            .unwrap_or_default()
            .dimmed()
    );
    if let Some(commit) = &execution.trigger_commit {
        let short = commit.get(..7).unwrap_or(commit);
        let author = execution.trigger_author_name.as_deref().unwrap_or("unknown");
        println!("    {} {}", short.cyan(), format!("by {}", author).dimmed());
    }
    println!(
        "    Started: {}{}",
        execution.started_at.format("%Y-%m-%d %H:%M:%S"),
        execution
            .duration
            .as_deref()
            .map(|d| format!(" · took {}", d))
            .unwrap_or_default()
    );
    println!();
}

fn print_stats(stats: &ExecutionStats) {
    println!(
        "  {} total · {} · {} · {} · {:.0}% success rate",
        stats.total.to_string().bold(),
        format!("{} succeeded", stats.successful).green(),
        format!("{} failed", stats.failed).red(),
        format!("{} in progress", stats.in_progress).yellow(),
        stats.success_rate
    );
}

async fn show_logs(client: &ApiClient, execution_id: &ExecutionId) -> Result<()> {
    let execution = client.execution_logs(execution_id).await?;

    println!(
        "{} {} {}",
        execution.repo_name.bold(),
        execution.execution_id.as_str().dimmed(),
        render::run_state(execution.status)
    );
    println!("{}", "─".repeat(80).dimmed());
    if execution.logs.is_empty() {
        println!("{}", "No logs recorded.".yellow());
    } else {
        for line in &execution.logs {
            render::log_line(line);
        }
    }

    Ok(())
}

async fn show_dag(client: &ApiClient, execution_id: &ExecutionId) -> Result<()> {
    let shape = client.fetch_graph(execution_id).await?;
    print_graph(&shape, &LiveExecution::new());
    Ok(())
}

/// Render the graph grouped by topological level, joined with live status.
fn print_graph(shape: &GraphShape, live: &LiveExecution) {
    println!(
        "{} {} {}",
        shape.repo_name.bold(),
        shape.branch.as_deref().unwrap_or("").dimmed(),
        format!("({} steps)", shape.total_steps).dimmed()
    );

    let view = GraphView::new(shape, live);
    for (level, nodes) in shape.levels() {
        println!("  {}", format!("level {}", level).dimmed());
        for node in nodes {
            let Some(node_view) = view.nodes.iter().find(|v| v.name == node.id) else {
                continue;
            };
            let mut markers = Vec::new();
            if node_view.is_root {
                markers.push("START");
            }
            if node_view.is_leaf {
                markers.push("END");
            }
            let marker = if markers.is_empty() {
                String::new()
            } else {
                format!(" [{}]", markers.join(", "))
            };
            println!(
                "    {} {}{} {}",
                "▸".cyan(),
                node.id.bold(),
                marker.dimmed(),
                render::run_state(node_view.status)
            );
            println!(
                "      {} · {} command(s) · {} dependency(ies)",
                node_view.image.dimmed(),
                node_view.commands.len(),
                node_view.dependency_count
            );
        }
    }
}

async fn watch(client: &ApiClient, execution_id: ExecutionId) -> Result<()> {
    let shape = client.fetch_graph(&execution_id).await?;
    let mut channel = EventChannel::connect(client.base_url(), execution_id.clone())?;
    let mut live = LiveExecution::new();

    println!(
        "Watching {} on {}",
        execution_id.as_str().bold(),
        shape.repo_name
    );

    while let Some(event) = channel.recv().await {
        match event {
            ChannelEvent::Connected => {
                println!("{}", "connected".dimmed());
                if live.should_offer_cancel() {
                    println!(
                        "{}",
                        format!("  (cancel with: flowdeck exec cancel {})", execution_id)
                            .dimmed()
                    );
                }
            }
            ChannelEvent::Joined(id) => {
                tracing::debug!("joined pipeline room {}", id.as_str());
            }
            ChannelEvent::Log(line) => {
                render::log_line(&line);
                live.apply(InboundEvent::Log(line));
            }
            ChannelEvent::Step(step) => {
                println!(
                    "  {} {} {}",
                    "step".dimmed(),
                    step.step_name.bold(),
                    render::run_state(step.status)
                );
                live.apply(InboundEvent::Step(step));
            }
            ChannelEvent::Status(status) => {
                live.apply(InboundEvent::Status(status));
            }
            ChannelEvent::Disconnected { retrying: true } => {
                println!("{}", "disconnected, reconnecting...".yellow());
            }
            ChannelEvent::Disconnected { retrying: false } => {
                println!("{}", "disconnected".red().bold());
                break;
            }
        }

        let overall = live.overall_status();
        if overall.is_terminal() {
            println!();
            print_graph(&shape, &live);
            print_outcome(overall, &live);
            channel.shutdown().await;
            break;
        }
    }

    Ok(())
}

fn print_outcome(overall: RunState, live: &LiveExecution) {
    let counts = live.counts();
    println!();
    match overall {
        RunState::Success => println!("{}", "✓ Pipeline succeeded!".green().bold()),
        RunState::Failed => println!("{}", "✗ Pipeline failed.".red().bold()),
        other => println!("Pipeline is {}", render::run_state(other)),
    }
    println!(
        "  {} · {} · {}",
        format!("{} succeeded", counts.success).green(),
        format!("{} failed", counts.failed).red(),
        format!("{} pending", counts.pending).dimmed()
    );
}

async fn cancel(client: &ApiClient, execution_id: &ExecutionId) -> Result<()> {
    let result = client.cancel_execution(execution_id).await?;

    println!("{}", "✓ Cancellation requested.".green().bold());
    if !result.message.is_empty() {
        println!("  {}", result.message.dimmed());
    }

    Ok(())
}

async fn rerun(client: &ApiClient, execution_id: &ExecutionId, follow: bool) -> Result<()> {
    let result = client.rerun_execution(execution_id).await?;

    println!("{}", "✓ Re-run triggered!".green().bold());
    let new_id = result.new_execution_id.clone();
    match &new_id {
        Some(id) => println!("  New execution: {}", id.as_str().cyan()),
        None => println!("  {}", result.message.dimmed()),
    }

    if follow {
        let target = new_id.unwrap_or_else(|| execution_id.clone());
        watch(client, target).await?;
    }

    Ok(())
}
