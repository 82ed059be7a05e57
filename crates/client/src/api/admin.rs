use tracing::instrument;

use catalogue_core::AdminStats;

use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Store-wide counts for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` (403) for non-admins.
    #[instrument(skip(self))]
    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        self.get_json("/admin/stats", &[]).await
    }
}
