//! HTTP response envelope
//!
//! Every backend response wraps its payload in
//! `{ success: bool, data: ..., message?: string, error?: string }`.
//! A `success: false` body is a logical failure and carries the reason in
//! `error` or `message`.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning a logical failure into the backend's
    /// message or a caller-supplied fallback.
    pub fn into_data(self, fallback: &str) -> Result<T, String> {
        if !self.success {
            return Err(self.failure_message(fallback));
        }
        self.data.ok_or_else(|| fallback.to_string())
    }

    /// The backend-supplied reason for a failure, or the fallback.
    pub fn failure_message(&self, fallback: &str) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_yields_data() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2]}"#).unwrap();
        assert_eq!(envelope.into_data("fallback").unwrap(), vec![1, 2]);
    }

    #[test]
    fn failure_surfaces_backend_message() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": false, "error": "queue unavailable"}"#).unwrap();
        assert_eq!(envelope.into_data("fallback").unwrap_err(), "queue unavailable");
    }

    #[test]
    fn failure_without_message_uses_fallback() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(envelope.into_data("fallback").unwrap_err(), "fallback");
    }

    #[test]
    fn success_without_data_uses_fallback() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(envelope.into_data("missing data").is_err());
    }
}
