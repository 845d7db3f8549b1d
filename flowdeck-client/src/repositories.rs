//! Repository and webhook endpoints

use std::collections::HashMap;

use flowdeck_core::domain::repository::Repository;
use flowdeck_core::dto::repo::SetupWebhook;

use crate::error::Result;
use crate::{ApiClient, encode_component};

impl ApiClient {
    // =============================================================================
    // Repositories
    // =============================================================================

    /// List the repositories visible to the authenticated user.
    pub async fn list_repositories(&self) -> Result<Vec<Repository>> {
        let url = format!("{}/api/repositories", self.base_url());
        let response = self.get(&url).send().await?;

        self.handle_envelope(response, "Failed to fetch repositories")
            .await
    }

    /// Check webhook installation for several repositories at once.
    ///
    /// # Returns
    /// A map from repository full name to whether a webhook is installed.
    pub async fn webhook_statuses(&self, repositories: &[String]) -> Result<HashMap<String, bool>> {
        let csv = repositories.join(",");
        let url = format!(
            "{}/api/repositories/webhook-status?repositories={}",
            self.base_url(),
            encode_component(&csv)
        );
        let response = self.get(&url).send().await?;

        self.handle_envelope(response, "Failed to fetch webhook statuses")
            .await
    }

    /// Check webhook installation for a single repository.
    pub async fn webhook_status(&self, repo_full_name: &str) -> Result<bool> {
        let url = format!(
            "{}/api/repositories/webhook-status?repoFullName={}",
            self.base_url(),
            encode_component(repo_full_name)
        );
        let response = self.get(&url).send().await?;

        let statuses: HashMap<String, bool> = self
            .handle_envelope(response, "Failed to check webhook status")
            .await?;
        Ok(statuses.get(repo_full_name).copied().unwrap_or(false))
    }

    /// Install the pipeline webhook on a repository.
    pub async fn setup_webhook(&self, repo_full_name: &str) -> Result<()> {
        let url = format!("{}/api/repositories/setup-webhook", self.base_url());
        let response = self
            .post(&url)
            .json(&SetupWebhook {
                repo_full_name: repo_full_name.to_string(),
            })
            .send()
            .await?;

        self.handle_empty_envelope(response, "Failed to setup webhook")
            .await
    }
}
