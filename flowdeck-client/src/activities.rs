//! Activity feed endpoint

use flowdeck_core::domain::activity::Activity;

use crate::ApiClient;
use crate::error::Result;

impl ApiClient {
    /// Fetch the most recent activities across all repositories.
    pub async fn recent_activities(&self, limit: usize) -> Result<Vec<Activity>> {
        let url = format!("{}/api/activities/recent?limit={}", self.base_url(), limit);
        let response = self.get(&url).send().await?;

        self.handle_envelope(response, "Failed to fetch activities")
            .await
    }
}
