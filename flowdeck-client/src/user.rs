//! Authenticated-user endpoint

use flowdeck_core::domain::user::UserInfo;

use crate::ApiClient;
use crate::error::Result;

impl ApiClient {
    /// Fetch the GitHub identity behind the current token.
    ///
    /// Doubles as a token validity probe: a 401 surfaces as
    /// [`ClientError::ApiError`](crate::ClientError::ApiError).
    pub async fn user_info(&self) -> Result<UserInfo> {
        let url = format!("{}/api/user/info", self.base_url());
        let response = self.get(&url).send().await?;

        self.handle_envelope(response, "Failed to fetch user info").await
    }
}
