//! Cached category tree.
//!
//! Every storefront page that filters or labels by category needs the full
//! tree, so it is fetched once and kept for five minutes using `moka`.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use catalogue_client::{ApiClient, ApiError};
use catalogue_core::Category;

const CACHE_KEY: &str = "categories";
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Read-through cache in front of `GET /categories`.
#[derive(Clone)]
pub struct CategoryDirectory {
    api: ApiClient,
    cache: Cache<&'static str, Arc<Vec<Category>>>,
}

impl CategoryDirectory {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(CACHE_TTL)
            .build();
        Self { api, cache }
    }

    /// The category forest.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree is not cached and cannot be fetched.
    #[instrument(skip(self))]
    pub async fn all(&self) -> Result<Arc<Vec<Category>>, ApiError> {
        if let Some(categories) = self.cache.get(CACHE_KEY).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories = Arc::new(self.api.list_categories().await?);
        self.cache
            .insert(CACHE_KEY, Arc::clone(&categories))
            .await;
        Ok(categories)
    }

    /// Drop the cached tree, e.g. after an admin edit.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}

impl std::fmt::Debug for CategoryDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryDirectory")
            .field("cached", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}
