//! Product cards and the product detail page.

use tracing::instrument;

use catalogue_client::{ApiClient, ApiError, ProductQuery};
use catalogue_core::{Product, ProductId};

/// Shown when a product has no images.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x800?text=No+Image";

/// How many other products the detail page suggests.
pub const RELATED_LIMIT: usize = 4;

/// Product display data for a grid tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub in_stock: bool,
}

impl ProductCard {
    /// Build a card, resolving the display image against the backend.
    #[must_use]
    pub fn new(product: &Product, api: &ApiClient) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.base_price.to_string(),
            image_url: product
                .display_image()
                .map_or_else(|| PLACEHOLDER_IMAGE.to_string(), |image| api.media_url(&image.image_url)),
            in_stock: product.in_stock(),
        }
    }
}

/// Everything the product detail page shows.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub product: Product,
    /// Gallery, display image first. Never empty.
    pub image_urls: Vec<String>,
    pub related: Vec<Product>,
}

impl ProductDetail {
    /// Load a product and a few others to suggest alongside it.
    ///
    /// Both requests run concurrently. Suggestions are best effort: if they
    /// fail the page still loads with none.
    ///
    /// # Errors
    ///
    /// Returns an error if the product itself cannot be loaded.
    #[instrument(skip(api))]
    pub async fn load(api: &ApiClient, id: ProductId) -> Result<Self, ApiError> {
        let related_query = ProductQuery::default();
        let (product, suggestions) =
            tokio::join!(api.get_product(id), api.search_products(&related_query));
        let product = product?;

        let related = match suggestions {
            Ok(page) => page
                .items
                .into_iter()
                .filter(|candidate| candidate.id != product.id)
                .take(RELATED_LIMIT)
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load related products");
                Vec::new()
            }
        };

        let image_urls = gallery(&product, api);
        Ok(Self {
            product,
            image_urls,
            related,
        })
    }

    /// Stock across all variants.
    #[must_use]
    pub fn total_stock(&self) -> i64 {
        self.product.total_stock()
    }

    /// Price line, e.g. `$1499.00` or `$1499.00 - $1599.00` when variants differ.
    #[must_use]
    pub fn price_label(&self) -> String {
        let (min, max) = self.product.price_range();
        if min == max {
            min.to_string()
        } else {
            format!("{min} - {max}")
        }
    }
}

fn gallery(product: &Product, api: &ApiClient) -> Vec<String> {
    let Some(display) = product.display_image() else {
        return vec![PLACEHOLDER_IMAGE.to_string()];
    };
    std::iter::once(display)
        .chain(product.images.iter().filter(|image| image.id != display.id))
        .map(|image| api.media_url(&image.image_url))
        .collect()
}
