//! Flowdeck HTTP client
//!
//! A typed client for the CI/CD backend consumed by the Flowdeck dashboard.
//!
//! Every HTTP endpoint wraps its payload in a `{success, data, message}`
//! envelope; this crate unwraps it and surfaces backend-reported failures as
//! [`ClientError::Backend`]. Live updates arrive over the realtime channel
//! in [`channel`].
//!
//! # Example
//!
//! ```no_run
//! use flowdeck_client::ApiClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ApiClient::new("http://localhost:3001").with_token("gh-token");
//!
//!     for repo in client.list_repositories().await? {
//!         println!("{}", repo.full_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
mod activities;
mod artifacts;
mod executions;
mod repositories;
mod secrets;
mod user;

// Re-export commonly used types
pub use channel::{ChannelCommand, ChannelEvent, EventChannel};
pub use error::{ClientError, Result};

use flowdeck_core::dto::envelope::ApiEnvelope;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the pipeline backend API
///
/// Provides methods for all backend endpoints, organized into logical groups:
/// - Repositories and webhook setup
/// - Pipeline executions, DAG shape and control (cancel/rerun)
/// - Recent activities
/// - Artifacts
/// - Per-repository secrets
/// - Authenticated user info
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base URL of the backend (e.g., "http://localhost:3001")
    base_url: String,
    /// Bearer token attached to authenticated endpoints
    token: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl ApiClient {
    /// Create a new client for the given backend base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            client: Client::new(),
        }
    }

    /// Attach a bearer token to all subsequent requests.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Create a client with a custom `reqwest` client (timeouts, proxies, TLS).
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            client,
        }
    }

    /// Get the base URL of the backend.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The browser entry point for the OAuth login flow.
    pub fn oauth_url(&self) -> String {
        format!("{}/auth/github", self.base_url)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    pub(crate) fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::GET, url)
    }

    pub(crate) fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::POST, url)
    }

    pub(crate) fn put(&self, url: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::PUT, url)
    }

    pub(crate) fn delete(&self, url: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::DELETE, url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Unwrap an enveloped API response.
    ///
    /// A non-2xx status or a `success: false` body both surface the backend
    /// message, falling back to `fallback` when the body carries none.
    pub(crate) async fn handle_envelope<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let message = Self::failure_body(response, fallback).await;
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("invalid JSON envelope: {}", e)))?;
        envelope.into_data(fallback).map_err(ClientError::Backend)
    }

    /// Unwrap an enveloped response whose payload the caller does not need.
    pub(crate) async fn handle_empty_envelope(
        &self,
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let message = Self::failure_body(response, fallback).await;
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        let envelope: ApiEnvelope<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("invalid JSON envelope: {}", e)))?;
        if !envelope.success {
            return Err(ClientError::Backend(envelope.failure_message(fallback)));
        }
        Ok(())
    }

    /// Extract the most useful message from an error response body.
    async fn failure_body(response: reqwest::Response, fallback: &str) -> String {
        let text = response.text().await.unwrap_or_default();
        if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&text) {
            return envelope.failure_message(fallback);
        }
        if text.is_empty() {
            fallback.to_string()
        } else {
            text
        }
    }
}

/// Everything outside the URL-unreserved set (RFC 3986 §2.3) is encoded.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode one path or query component.
///
/// Repository full names contain `/`, and secret keys and file names are
/// user-controlled; all of them must be encoded before interpolation.
pub(crate) fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new("http://localhost:3001");
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:3001/");
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[test]
    fn test_oauth_url() {
        let client = ApiClient::new("http://localhost:3001");
        assert_eq!(client.oauth_url(), "http://localhost:3001/auth/github");
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("acme/app"), "acme%2Fapp");
        assert_eq!(encode_component("MY_KEY.v2"), "MY_KEY.v2");
        assert_eq!(encode_component("a b"), "a%20b");
        assert_eq!(encode_component("café"), "caf%C3%A9");
    }
}
