//! Recent activity feed
//!
//! Activity entries are tagged-variant records; the `type` field selects the
//! payload shape, so the detail is modeled as a sum type rather than a bag of
//! optional fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the recent-activity feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub repository: RepositorySummary,
    pub status: ActivityStatus,
    #[serde(flatten)]
    pub detail: ActivityDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Success,
    Failed,
    InProgress,
}

/// Variant-specific payload, discriminated by the `type` field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityDetail {
    Push {
        #[serde(default)]
        commit: Option<CommitInfo>,
        #[serde(default)]
        pusher: Option<PusherInfo>,
    },
    WebhookSetup {},
    PipelineExecution {
        #[serde(default)]
        metadata: Option<serde_json::Value>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    pub id: String,
    pub message: String,
    pub author: AuthorInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PusherInfo {
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_push_variant() {
        let json = r#"{
            "id": "act-1",
            "type": "push",
            "timestamp": "2025-01-01T12:00:00Z",
            "repository": { "name": "app", "full_name": "acme/app" },
            "commit": {
                "id": "abc123",
                "message": "fix build",
                "author": { "name": "Dev", "email": "dev@acme.io" }
            },
            "pusher": { "name": "Dev", "email": "dev@acme.io" },
            "status": "success"
        }"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        match activity.detail {
            ActivityDetail::Push { commit, .. } => {
                assert_eq!(commit.unwrap().message, "fix build");
            }
            other => panic!("expected push variant, got {:?}", other),
        }
    }

    #[test]
    fn decodes_webhook_setup_variant() {
        let json = r#"{
            "id": "act-2",
            "type": "webhook_setup",
            "timestamp": "2025-01-01T12:00:00Z",
            "repository": { "name": "app", "full_name": "acme/app" },
            "status": "in_progress"
        }"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        assert!(matches!(activity.detail, ActivityDetail::WebhookSetup {}));
        assert_eq!(activity.status, ActivityStatus::InProgress);
    }
}
