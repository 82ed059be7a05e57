//! Storefront context shared by every page controller.

use std::sync::Arc;

use catalogue_client::{ApiClient, SessionStore};

use crate::catalog::CatalogController;
use crate::categories::CategoryDirectory;
use crate::profile::ProfileController;
use crate::wishlist::WishlistController;

/// Shared storefront resources.
///
/// This struct is cheaply cloneable via `Arc`; clones share the API client,
/// the session and the category cache.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    api: ApiClient,
    categories: CategoryDirectory,
}

impl Storefront {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let categories = CategoryDirectory::new(api.clone());
        Self {
            inner: Arc::new(StorefrontInner { api, categories }),
        }
    }

    /// Get a reference to the API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the session.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        self.inner.api.session()
    }

    /// Get a reference to the cached category tree.
    #[must_use]
    pub fn categories(&self) -> &CategoryDirectory {
        &self.inner.categories
    }

    /// Open the catalog page at `href`.
    pub async fn catalog(&self, href: &str) -> CatalogController {
        CatalogController::mount(self.api().clone(), self.categories(), href).await
    }

    #[must_use]
    pub fn profile(&self) -> ProfileController {
        ProfileController::new(self.api().clone())
    }

    #[must_use]
    pub fn wishlist(&self) -> WishlistController {
        WishlistController::new(self.api().clone())
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("api", &self.inner.api)
            .field("categories", &self.inner.categories)
            .finish()
    }
}
