//! Secret management request bodies

use serde::Serialize;

use crate::domain::secret::SecretInput;

/// Body for `POST .../secrets`
#[derive(Debug, Clone, Serialize)]
pub struct CreateSecret {
    pub key: String,
    pub value: String,
}

/// Body for `PUT .../secrets` (bulk replace)
#[derive(Debug, Clone, Serialize)]
pub struct BulkSecrets {
    pub secrets: Vec<SecretInput>,
}

/// Body for `POST /api/secrets/secrets/validate-key`
#[derive(Debug, Clone, Serialize)]
pub struct ValidateKey {
    pub key: String,
}
