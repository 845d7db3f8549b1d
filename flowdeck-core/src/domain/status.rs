//! Live status types
//!
//! States pushed over the realtime channel for one pipeline execution and
//! its individual steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier for one run of a pipeline.
///
/// Used as the subscription key for the realtime channel and as the
/// correlation key across the DAG shape, logs, artifacts and control calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(pub String);

impl ExecutionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ExecutionId {
    fn from(s: String) -> Self {
        ExecutionId(s)
    }
}

impl From<&str> for ExecutionId {
    fn from(s: &str) -> Self {
        ExecutionId(s.to_string())
    }
}

/// Live state of a step or of the whole pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Pending,
    Running,
    Success,
    Failed,
}

impl RunState {
    /// A terminal state never transitions backward without a full reset.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Success | RunState::Failed)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Pending => write!(f, "pending"),
            RunState::Running => write!(f, "running"),
            RunState::Success => write!(f, "success"),
            RunState::Failed => write!(f, "failed"),
        }
    }
}

/// Coarse status for a whole execution pushed by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStatusEvent {
    pub status: RunState,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

/// Status update for one named step, replacing the prior record wholesale
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepStatusEvent {
    pub step_name: String,
    pub status: RunState,
    #[serde(default)]
    pub metadata: Option<StepTiming>,
    pub timestamp: DateTime<Utc>,
}

/// Optional timing metadata attached to a step status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTiming {
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Duration in milliseconds as reported by the backend
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_state_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&RunState::Running).unwrap(), "\"running\"");
        let parsed: RunState = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(parsed, RunState::Failed);
    }

    #[test]
    fn terminal_states() {
        assert!(RunState::Success.is_terminal());
        assert!(RunState::Failed.is_terminal());
        assert!(!RunState::Running.is_terminal());
        assert!(!RunState::Pending.is_terminal());
    }

    #[test]
    fn step_status_event_decodes_camel_case() {
        let json = r#"{
            "stepName": "build",
            "status": "running",
            "metadata": { "startTime": "2025-01-01T00:00:00Z" },
            "timestamp": "2025-01-01T00:00:01Z"
        }"#;
        let event: StepStatusEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.step_name, "build");
        assert_eq!(event.status, RunState::Running);
        assert!(event.metadata.unwrap().start_time.is_some());
    }
}
