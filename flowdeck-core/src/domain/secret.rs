//! Per-repository secrets
//!
//! Secret values are write-only from the client's perspective; the backend
//! only ever returns key names and timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a stored secret; the value is never returned
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretMetadata {
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A key/value pair submitted when creating or bulk-updating secrets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretInput {
    pub key: String,
    pub value: String,
}

/// Result of server-side key validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValidation {
    pub is_valid: bool,
    pub message: String,
}
