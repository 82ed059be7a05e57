//! Wishlist records.

use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::types::{ProductId, UserId, WishlistItemId};

/// A product saved to the current user's wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub product: Product,
}

/// Body of an add-to-wishlist request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistAdd {
    pub product_id: ProductId,
}
