//! Pipeline execution records
//!
//! List-view entities from the executions endpoint, distinct from the live
//! channel state: the list reports coarse persisted states while the channel
//! streams fine-grained live ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::status::ExecutionId;

/// One row of the executions list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineExecution {
    pub id: String,
    pub execution_id: ExecutionId,
    pub repo_name: String,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    pub status: ExecutionState,
    #[serde(default)]
    pub trigger_commit: Option<String>,
    #[serde(default)]
    pub trigger_author_name: Option<String>,
    #[serde(default)]
    pub trigger_author_email: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: Option<String>,
}

/// Persisted execution status as reported by the list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    Queued,
    InProgress,
    Success,
    Failed,
}

impl std::fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionState::Queued => write!(f, "queued"),
            ExecutionState::InProgress => write!(f, "in_progress"),
            ExecutionState::Success => write!(f, "success"),
            ExecutionState::Failed => write!(f, "failed"),
        }
    }
}

/// One execution with its stored log history, from the logs endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionWithLogs {
    pub id: String,
    pub execution_id: ExecutionId,
    pub status: crate::domain::status::RunState,
    pub repo_name: String,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub trigger_commit: Option<String>,
    #[serde(default)]
    pub trigger_author_name: Option<String>,
    #[serde(default)]
    pub trigger_author_email: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub logs: Vec<crate::domain::log::LogLine>,
}

/// Aggregate counters returned alongside the executions list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStats {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub in_progress: u64,
    pub success_rate: f64,
}
