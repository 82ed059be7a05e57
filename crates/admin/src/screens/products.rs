//! Product management: paginated search, create, edit, delete.

use std::sync::{Mutex, PoisonError};

use tracing::instrument;

use catalogue_client::{ApiClient, ProductQuery, Upload};
use catalogue_core::{Product, ProductDraft, ProductId};

use crate::confirm::Confirm;
use crate::crud::CrudScreen;
use crate::error::CrudError;

/// Rows per page on the product list.
pub const PAGE_SIZE: u32 = 12;

/// Pseudo-row key for creating a product.
const NEW_PRODUCT: ProductId = ProductId::new(0);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Listing {
    search: String,
    page: u32,
    total_pages: u32,
    total: u64,
}

impl Default for Listing {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            total_pages: 1,
            total: 0,
        }
    }
}

/// The product list and its actions.
#[derive(Debug)]
pub struct ProductsScreen {
    api: ApiClient,
    crud: CrudScreen<ProductId, Product>,
    listing: Mutex<Listing>,
}

impl ProductsScreen {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            crud: CrudScreen::new(),
            listing: Mutex::new(Listing::default()),
        }
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.crud.rows()
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.listing().page
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.listing().total_pages
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.listing().total
    }

    #[must_use]
    pub fn search_term(&self) -> String {
        self.listing().search
    }

    #[must_use]
    pub const fn crud(&self) -> &CrudScreen<ProductId, Product> {
        &self.crud
    }

    /// Fetch the current page. On failure the list is emptied and the error
    /// logged.
    #[instrument(skip(self))]
    pub async fn load(&self) {
        let listing = self.listing();
        let query = ProductQuery {
            search: Some(listing.search.clone()).filter(|s| !s.is_empty()),
            page: Some(listing.page),
            page_size: Some(PAGE_SIZE),
            ..ProductQuery::default()
        };

        match self.api.search_products(&query).await {
            Ok(results) => {
                self.crud.set_rows(results.items);
                let mut listing = self.listing_mut();
                listing.total_pages = results.pages.max(1);
                listing.total = results.total;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch products");
                self.crud.set_rows(Vec::new());
            }
        }
    }

    /// Search by `term`. A new term starts again at page 1.
    pub async fn search(&self, term: &str) {
        {
            let mut listing = self.listing_mut();
            let term = term.trim();
            if listing.search != term {
                listing.search = term.to_string();
                listing.page = 1;
            }
        }
        self.load().await;
    }

    /// Show page `page`, clamped to the known page range.
    pub async fn go_to_page(&self, page: u32) {
        {
            let mut listing = self.listing_mut();
            listing.page = page.clamp(1, listing.total_pages);
        }
        self.load().await;
    }

    pub async fn next_page(&self) {
        self.go_to_page(self.page().saturating_add(1)).await;
    }

    pub async fn previous_page(&self) {
        self.go_to_page(self.page().saturating_sub(1)).await;
    }

    /// Fetch one product for the edit form.
    ///
    /// # Errors
    ///
    /// Returns `CrudError::Rejected` with "Failed to load product" or the
    /// backend detail.
    pub async fn product(&self, id: ProductId) -> Result<Product, CrudError> {
        self.api
            .get_product(id)
            .await
            .map_err(|e| CrudError::rejected(e, "Failed to load product"))
    }

    /// Create a product, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns `CrudError` if a create is already running or the backend
    /// rejects it.
    #[instrument(skip(self, images), fields(name = %draft.name))]
    pub async fn create(&self, draft: &ProductDraft, images: &[Upload]) -> Result<Product, CrudError> {
        let product = self
            .crud
            .mutate(
                NEW_PRODUCT,
                "Failed to save product",
                self.api.create_product(draft, images),
            )
            .await?;
        self.load().await;
        Ok(product)
    }

    /// Update a product, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns `CrudError` if the row is busy or the backend rejects it.
    #[instrument(skip(self, draft, images))]
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        images: &[Upload],
    ) -> Result<Product, CrudError> {
        let product = self
            .crud
            .mutate(
                id,
                "Failed to save product",
                self.api.update_product(id, draft, images),
            )
            .await?;
        self.load().await;
        Ok(product)
    }

    /// Delete a product after confirmation, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns `CrudError::Cancelled` if declined, otherwise as
    /// [`CrudScreen::mutate`].
    #[instrument(skip(self, confirm))]
    pub async fn delete(&self, id: ProductId, confirm: &dyn Confirm) -> Result<(), CrudError> {
        let name = self
            .crud
            .find(|product| product.id == id)
            .map_or_else(|| format!("product {id}"), |product| product.name);
        let prompt = format!("Are you sure you want to delete \"{name}\"? This action cannot be undone.");

        self.crud
            .delete(
                id,
                confirm,
                &prompt,
                "Failed to delete product",
                self.api.delete_product(id),
            )
            .await?;
        self.load().await;
        Ok(())
    }

    fn listing(&self) -> Listing {
        self.listing_mut().clone()
    }

    fn listing_mut(&self) -> std::sync::MutexGuard<'_, Listing> {
        self.listing.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
