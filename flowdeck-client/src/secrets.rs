//! Per-repository secret endpoints
//!
//! Secret values are write-only; list responses only ever carry key names
//! and timestamps.

use flowdeck_core::domain::secret::{KeyValidation, SecretInput, SecretMetadata};
use flowdeck_core::dto::secrets::{BulkSecrets, CreateSecret, ValidateKey};

use crate::error::Result;
use crate::{ApiClient, encode_component};

impl ApiClient {
    /// List secret keys stored for a repository.
    pub async fn list_secrets(&self, repo_full_name: &str) -> Result<Vec<SecretMetadata>> {
        let url = self.secrets_url(repo_full_name);
        let response = self.get(&url).send().await?;

        self.handle_envelope(response, "Failed to fetch secrets").await
    }

    /// Create or overwrite a single secret.
    pub async fn create_secret(&self, repo_full_name: &str, key: &str, value: &str) -> Result<()> {
        let url = self.secrets_url(repo_full_name);
        let response = self
            .post(&url)
            .json(&CreateSecret {
                key: key.to_string(),
                value: value.to_string(),
            })
            .send()
            .await?;

        self.handle_empty_envelope(response, "Failed to save secret")
            .await
    }

    /// Replace the full secret set for a repository in one call.
    pub async fn bulk_update_secrets(
        &self,
        repo_full_name: &str,
        secrets: Vec<SecretInput>,
    ) -> Result<()> {
        let url = self.secrets_url(repo_full_name);
        let response = self.put(&url).json(&BulkSecrets { secrets }).send().await?;

        self.handle_empty_envelope(response, "Failed to update secrets")
            .await
    }

    /// Delete a single secret by key.
    pub async fn delete_secret(&self, repo_full_name: &str, key: &str) -> Result<()> {
        let url = format!("{}/{}", self.secrets_url(repo_full_name), encode_component(key));
        let response = self.delete(&url).send().await?;

        self.handle_empty_envelope(response, "Failed to delete secret")
            .await
    }

    /// Ask the backend whether a key name is acceptable before storing it.
    pub async fn validate_secret_key(&self, key: &str) -> Result<KeyValidation> {
        let url = format!("{}/api/secrets/secrets/validate-key", self.base_url());
        let response = self
            .post(&url)
            .json(&ValidateKey {
                key: key.to_string(),
            })
            .send()
            .await?;

        self.handle_envelope(response, "Failed to validate key").await
    }

    fn secrets_url(&self, repo_full_name: &str) -> String {
        format!(
            "{}/api/secrets/repositories/{}/secrets",
            self.base_url(),
            encode_component(repo_full_name)
        )
    }
}
