//! Pipeline control DTOs

use serde::{Deserialize, Serialize};

use crate::domain::status::ExecutionId;

/// Payload returned by cancel/rerun endpoints.
///
/// Rerun creates a brand-new execution; the caller is responsible for
/// navigating to it. Neither call mutates local live state directly, the
/// channel reports the resulting transition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlOutcome {
    #[serde(default)]
    pub new_execution_id: Option<ExecutionId>,
}

/// Confirmation returned to the CLI layer, combining the backend message
/// with the structured payload.
#[derive(Debug, Clone)]
pub struct ControlResult {
    pub message: String,
    pub new_execution_id: Option<ExecutionId>,
}
