//! Shared terminal rendering helpers

use colored::*;
use flowdeck_core::domain::execution::ExecutionState;
use flowdeck_core::domain::log::{LogLevel, LogLine};
use flowdeck_core::domain::status::RunState;

/// Colored label for a live run state.
pub fn run_state(state: RunState) -> ColoredString {
    match state {
        RunState::Pending => "pending".dimmed(),
        RunState::Running => "running".yellow().bold(),
        RunState::Success => "success".green().bold(),
        RunState::Failed => "failed".red().bold(),
    }
}

/// Colored label for a persisted execution state.
pub fn execution_state(state: ExecutionState) -> ColoredString {
    match state {
        ExecutionState::Queued => "queued".dimmed(),
        ExecutionState::InProgress => "in_progress".yellow().bold(),
        ExecutionState::Success => "success".green().bold(),
        ExecutionState::Failed => "failed".red().bold(),
    }
}

/// Print one log line colored by level, prefixed with its step when set.
pub fn log_line(line: &LogLine) {
    let message = match line.level {
        LogLevel::Info => line.message.normal(),
        LogLevel::Warn => line.message.yellow(),
        LogLevel::Error => line.message.red(),
    };
    let when = line.timestamp.format("%H:%M:%S");
    match &line.step {
        Some(step) => println!(
            "  {} {} {}",
            when.to_string().dimmed(),
            format!("[{}]", step).cyan(),
            message
        ),
        None => println!("  {} {}", when.to_string().dimmed(), message),
    }
}
