//! Repository management request bodies

use serde::Serialize;

/// Body for `POST /api/repositories/setup-webhook`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupWebhook {
    pub repo_full_name: String,
}
