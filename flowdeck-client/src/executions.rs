//! Pipeline execution endpoints
//!
//! List/detail queries, the static DAG shape, and the cancel/rerun control
//! calls. Control calls never mutate local live state; the realtime channel
//! reports the resulting transition.

use serde::Deserialize;

use flowdeck_core::domain::execution::{ExecutionStats, ExecutionWithLogs, PipelineExecution};
use flowdeck_core::domain::graph::GraphShape;
use flowdeck_core::domain::status::ExecutionId;
use flowdeck_core::dto::control::{ControlOutcome, ControlResult};
use flowdeck_core::dto::envelope::ApiEnvelope;

use crate::error::{ClientError, Result};
use crate::{ApiClient, encode_component};

/// One page of the executions list with its aggregate stats
#[derive(Debug, Deserialize)]
pub struct ExecutionPage {
    #[serde(default)]
    pub executions: Vec<PipelineExecution>,
    #[serde(default)]
    pub stats: Option<ExecutionStats>,
}

impl ApiClient {
    // =============================================================================
    // Executions
    // =============================================================================

    /// List recent executions, optionally filtered to one repository.
    pub async fn list_executions(
        &self,
        repo_name: Option<&str>,
        limit: usize,
    ) -> Result<ExecutionPage> {
        let mut url = format!("{}/api/pipeline/executions?limit={}", self.base_url(), limit);
        if let Some(repo) = repo_name {
            url.push_str(&format!("&repoName={}", encode_component(repo)));
        }
        let response = self.get(&url).send().await?;

        self.handle_envelope(response, "Failed to fetch pipeline executions")
            .await
    }

    /// Fetch one execution together with its stored log history.
    pub async fn execution_logs(&self, execution_id: &ExecutionId) -> Result<ExecutionWithLogs> {
        let url = format!(
            "{}/api/pipeline/executions/{}/logs",
            self.base_url(),
            encode_component(execution_id.as_str())
        );
        let response = self.get(&url).send().await?;

        self.handle_envelope(response, "Failed to fetch execution logs")
            .await
    }

    /// Fetch the static DAG shape for an execution.
    ///
    /// The shape is fetched once per view; live step state arrives separately
    /// over the channel and is merged client-side.
    pub async fn fetch_graph(&self, execution_id: &ExecutionId) -> Result<GraphShape> {
        let url = format!(
            "{}/api/pipeline/dag/{}",
            self.base_url(),
            encode_component(execution_id.as_str())
        );
        let response = self.get(&url).send().await?;

        self.handle_envelope(response, "Failed to load DAG data").await
    }

    // =============================================================================
    // Control
    // =============================================================================

    /// Request cancellation of a running execution.
    pub async fn cancel_execution(&self, execution_id: &ExecutionId) -> Result<ControlResult> {
        let url = format!(
            "{}/api/queue/jobs/{}/cancel",
            self.base_url(),
            encode_component(execution_id.as_str())
        );
        let response = self.post(&url).send().await?;

        self.control_result(response, "Failed to cancel pipeline").await
    }

    /// Rerun an execution with the same configuration.
    ///
    /// On success the backend returns a new execution id; the caller is
    /// responsible for switching to the new execution's view.
    pub async fn rerun_execution(&self, execution_id: &ExecutionId) -> Result<ControlResult> {
        let url = format!(
            "{}/api/queue/jobs/{}/rerun",
            self.base_url(),
            encode_component(execution_id.as_str())
        );
        let response = self.post(&url).send().await?;

        self.control_result(response, "Failed to rerun pipeline").await
    }

    /// Control responses carry both a human-readable message and an optional
    /// structured payload, so they bypass the plain envelope helper.
    async fn control_result(
        &self,
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<ControlResult> {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let envelope: ApiEnvelope<ControlOutcome> = serde_json::from_str(&text)
            .map_err(|e| ClientError::ParseError(format!("invalid JSON envelope: {}", e)))?;

        if !status.is_success() || !envelope.success {
            let message = envelope.failure_message(fallback);
            if !status.is_success() {
                return Err(ClientError::api_error(status.as_u16(), message));
            }
            return Err(ClientError::Backend(message));
        }

        Ok(ControlResult {
            message: envelope
                .message
                .clone()
                .unwrap_or_else(|| "OK".to_string()),
            new_execution_id: envelope.data.and_then(|d| d.new_execution_id),
        })
    }
}
