//! Admin dashboard.

use tracing::instrument;

use catalogue_client::ApiClient;
use catalogue_core::AdminStats;

/// Store-wide counts, or `None` when they cannot be fetched.
#[instrument(skip(api))]
pub async fn load_stats(api: &ApiClient) -> Option<AdminStats> {
    match api.admin_stats().await {
        Ok(stats) => Some(stats),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load dashboard stats");
            None
        }
    }
}

/// Dashboard cards as label and count.
#[must_use]
pub fn cards(stats: &AdminStats) -> [(&'static str, u64); 3] {
    [
        ("Total Users", stats.total_users),
        ("Total Products", stats.total_products),
        ("Total Categories", stats.total_categories),
    ]
}
