//! Artifact endpoints

use serde::Deserialize;

use flowdeck_core::domain::artifact::Artifact;
use flowdeck_core::domain::status::ExecutionId;

use crate::error::Result;
use crate::{ApiClient, encode_component};

#[derive(Debug, Deserialize)]
struct ArtifactList {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadLink {
    download_url: String,
}

impl ApiClient {
    /// List artifacts produced by an execution.
    pub async fn list_artifacts(&self, execution_id: &ExecutionId) -> Result<Vec<Artifact>> {
        let url = format!(
            "{}/api/artifacts/{}",
            self.base_url(),
            encode_component(execution_id.as_str())
        );
        let response = self.get(&url).send().await?;

        let list: ArtifactList = self
            .handle_envelope(response, "Failed to fetch artifacts")
            .await?;
        Ok(list.artifacts)
    }

    /// Obtain a short-lived download URL for one artifact file.
    pub async fn artifact_download_url(
        &self,
        execution_id: &ExecutionId,
        step_name: &str,
        file_name: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/api/artifacts/{}/{}/{}/download",
            self.base_url(),
            encode_component(execution_id.as_str()),
            encode_component(step_name),
            encode_component(file_name)
        );
        let response = self.get(&url).send().await?;

        let link: DownloadLink = self
            .handle_envelope(response, "Failed to generate download URL")
            .await?;
        Ok(link.download_url)
    }
}
