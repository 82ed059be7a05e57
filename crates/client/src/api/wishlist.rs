//! The signed-in user's wishlist.

use reqwest::Method;
use tracing::instrument;

use catalogue_core::{ProductId, WishlistAdd, WishlistItem};

use super::{ApiClient, Auth};
use crate::error::ApiError;

impl ApiClient {
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when no valid session exists.
    #[instrument(skip(self))]
    pub async fn get_wishlist(&self) -> Result<Vec<WishlistItem>, ApiError> {
        self.get_json("/wishlist", &[]).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Api` if the product is unknown or already listed.
    #[instrument(skip(self))]
    pub async fn add_to_wishlist(&self, product_id: ProductId) -> Result<WishlistItem, ApiError> {
        self.send_json(Auth::Bearer, Method::POST, "/wishlist", &WishlistAdd { product_id })
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Api` (404) if the product is not on the wishlist.
    #[instrument(skip(self))]
    pub async fn remove_from_wishlist(
        &self,
        product_id: ProductId,
    ) -> Result<WishlistItem, ApiError> {
        self.delete_json(&format!("/wishlist/{product_id}")).await
    }
}
