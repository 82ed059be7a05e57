//! Wishlist page and the heart toggle on product pages.

use tracing::instrument;

use catalogue_client::{ApiClient, ApiError};
use catalogue_core::{ProductId, WishlistItem};

/// Whether `product_id` is on the signed-in user's wishlist.
///
/// Best effort: anonymous visitors and failed lookups both read as `false`.
#[instrument(skip(api))]
pub async fn is_wishlisted(api: &ApiClient, product_id: ProductId) -> bool {
    if !api.session().is_authenticated() {
        return false;
    }
    match api.get_wishlist().await {
        Ok(items) => items.iter().any(|item| item.product_id == product_id),
        Err(e) => {
            tracing::warn!(error = %e, "Wishlist lookup failed");
            false
        }
    }
}

/// The signed-in user's wishlist.
#[derive(Debug)]
pub struct WishlistController {
    api: ApiClient,
    items: Vec<WishlistItem>,
}

impl WishlistController {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }

    /// Reload the list. On failure the list is emptied and the error logged.
    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        match self.api.get_wishlist().await {
            Ok(items) => self.items = items,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load wishlist");
                self.items.clear();
            }
        }
    }

    /// Save a product.
    ///
    /// # Errors
    ///
    /// Returns the backend error, e.g. when the product is already saved.
    #[instrument(skip(self))]
    pub async fn add(&mut self, product_id: ProductId) -> Result<(), ApiError> {
        let item = self.api.add_to_wishlist(product_id).await?;
        self.items.retain(|existing| existing.product_id != product_id);
        self.items.push(item);
        Ok(())
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, product_id: ProductId) -> Result<(), ApiError> {
        self.api.remove_from_wishlist(product_id).await?;
        self.items.retain(|item| item.product_id != product_id);
        Ok(())
    }

    /// Add the product if missing, remove it otherwise. Returns whether it
    /// is saved afterwards.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the list is unchanged in that case.
    pub async fn toggle(&mut self, product_id: ProductId) -> Result<bool, ApiError> {
        if self.contains(product_id) {
            self.remove(product_id).await?;
            Ok(false)
        } else {
            self.add(product_id).await?;
            Ok(true)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalogue_client::{ClientConfig, SessionStore};
    use url::Url;

    use super::*;

    #[tokio::test]
    async fn test_anonymous_visitor_has_nothing_wishlisted() {
        let config = ClientConfig::new(Url::parse("http://127.0.0.1:9/api/v1").unwrap());
        let api = ApiClient::new(&config, SessionStore::in_memory()).unwrap();
        assert!(!is_wishlisted(&api, ProductId::new(1)).await);
    }
}
