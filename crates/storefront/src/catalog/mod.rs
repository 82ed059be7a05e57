//! Catalog page controller.
//!
//! Keeps three things in step: the filter state, the product grid and the
//! location's query string. The URL is read once on mount; after that every
//! filter change resets to page 1, pushes a new location and refetches. The
//! backend owns pagination, so the controller only ever holds one page.
//!
//! Fetches are awaited one at a time per controller. A failed fetch degrades
//! to an empty single page and is logged, never surfaced as an error.

mod pages;
mod query;

use std::sync::Arc;

use tracing::instrument;

use catalogue_client::ApiClient;
use catalogue_core::{Category, CategoryId, Product};

pub use pages::{PageLink, page_window};
pub use query::{CatalogFilters, CatalogQuery, ITEMS_PER_PAGE, PRICE_CEILING, SortKey};

use crate::categories::CategoryDirectory;
use crate::navigation::{Location, Navigator};

/// State and actions of the catalog page.
#[derive(Debug)]
pub struct CatalogController {
    api: ApiClient,
    navigator: Navigator,
    categories: Arc<Vec<Category>>,
    filters: CatalogFilters,
    page: u32,
    total_pages: u32,
    total_items: u64,
    products: Vec<Product>,
}

impl CatalogController {
    /// Open the catalog at `href`.
    ///
    /// Category slugs need the category tree, so it is loaded first. A URL
    /// using the singular `category` parameter is rewritten in place to the
    /// `categories` form once the slug resolves.
    #[instrument(skip(api, directory))]
    pub async fn mount(api: ApiClient, directory: &CategoryDirectory, href: &str) -> Self {
        let location = Location::parse(href);
        let query = CatalogQuery::from_location(&location);

        let categories = directory.all().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to fetch categories");
            Arc::new(Vec::new())
        });
        let filters = CatalogFilters::resolve(&query, &categories);

        let mut navigator = Navigator::starting_at(location.clone());
        if query.legacy_category
            && !filters.category_ids.is_empty()
            && let Some(slug) = query.category_slugs.first()
        {
            let mut normalized = location;
            normalized.delete("category");
            normalized.set("categories", slug.clone());
            navigator.replace(normalized);
        }

        let mut controller = Self {
            api,
            navigator,
            categories,
            filters,
            page: query.page,
            total_pages: 1,
            total_items: 0,
            products: Vec::new(),
        };
        controller.fetch().await;
        if controller.page > controller.total_pages {
            controller.settle_on_last_page().await;
        }
        controller
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn filters(&self) -> &CatalogFilters {
        &self.filters
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// The location the catalog is showing.
    #[must_use]
    pub fn location(&self) -> &Location {
        self.navigator.current()
    }

    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    // =========================================================================
    // Filter changes
    // =========================================================================

    pub async fn set_search(&mut self, search: &str) {
        let filters = CatalogFilters {
            search: search.trim().to_string(),
            ..self.filters.clone()
        };
        self.apply(filters).await;
    }

    pub async fn set_categories(&mut self, category_ids: Vec<CategoryId>) {
        let filters = CatalogFilters {
            category_ids,
            ..self.filters.clone()
        };
        self.apply(filters).await;
    }

    pub async fn toggle_category(&mut self, id: CategoryId) {
        let mut filters = self.filters.clone();
        toggle(&mut filters.category_ids, id);
        self.apply(filters).await;
    }

    pub async fn toggle_color(&mut self, color: &str) {
        let mut filters = self.filters.clone();
        toggle(&mut filters.colors, color.to_string());
        self.apply(filters).await;
    }

    pub async fn toggle_size(&mut self, size: &str) {
        let mut filters = self.filters.clone();
        toggle(&mut filters.sizes, size.to_string());
        self.apply(filters).await;
    }

    /// Set the price ceiling, clamped to [`PRICE_CEILING`].
    pub async fn set_max_price(&mut self, max_price: u32) {
        let filters = CatalogFilters {
            max_price: max_price.min(PRICE_CEILING),
            ..self.filters.clone()
        };
        self.apply(filters).await;
    }

    pub async fn set_sort(&mut self, sort: SortKey) {
        let filters = CatalogFilters {
            sort,
            ..self.filters.clone()
        };
        self.apply(filters).await;
    }

    /// Remove every facet; an active search term stays. Parameters the
    /// catalog does not own are dropped from the URL.
    pub async fn clear_filters(&mut self) {
        let filters = self.filters.cleared();
        let location = Location::new(self.navigator.current().path());
        self.apply_at(filters, location).await;
    }

    /// Show page `page`. Pages outside `1..=total_pages` are ignored and
    /// `false` is returned.
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        if page < 1 || page > self.total_pages {
            tracing::debug!(page, total_pages = self.total_pages, "Ignoring out-of-range page");
            return false;
        }

        self.page = page;
        let mut location = self.navigator.current().clone();
        if page == 1 {
            location.delete("page");
        } else {
            location.set("page", page.to_string());
        }
        self.navigator.push(location);
        self.fetch().await;
        true
    }

    async fn apply(&mut self, filters: CatalogFilters) {
        let location = self.navigator.current().clone();
        self.apply_at(filters, location).await;
    }

    /// Show page 1 of `filters`, writing them over `location`.
    async fn apply_at(&mut self, filters: CatalogFilters, mut location: Location) {
        self.filters = filters;
        self.page = 1;
        self.filters
            .to_query(self.page, &self.categories)
            .write_to(&mut location);
        self.navigator.push(location);
        self.fetch().await;
    }

    /// A link past the last page shows the last page instead, and the URL is
    /// rewritten in place to match.
    async fn settle_on_last_page(&mut self) {
        tracing::debug!(page = self.page, total_pages = self.total_pages, "Page past the end");
        self.page = self.total_pages;
        let mut location = self.navigator.current().clone();
        if self.page == 1 {
            location.delete("page");
        } else {
            location.set("page", self.page.to_string());
        }
        self.navigator.replace(location);
        self.fetch().await;
    }

    #[instrument(skip(self), fields(page = self.page))]
    async fn fetch(&mut self) {
        let query = self.filters.to_product_query(self.page);
        match self.api.search_products(&query).await {
            Ok(result) => {
                tracing::debug!(total = result.total, pages = result.pages, "Products loaded");
                self.products = result.items;
                self.total_pages = result.pages.max(1);
                self.total_items = result.total;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch products");
                self.products.clear();
                self.total_pages = 1;
                self.total_items = 0;
            }
        }
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Heading line above the grid.
    #[must_use]
    pub fn summary(&self) -> String {
        if !self.filters.search.is_empty() {
            return format!("Showing results for \"{}\"", self.filters.search);
        }

        let per_page = u64::from(ITEMS_PER_PAGE);
        let start = if self.total_items == 0 {
            0
        } else {
            u64::from(self.page.saturating_sub(1)) * per_page + 1
        };
        let end = (u64::from(self.page) * per_page).min(self.total_items);

        let names: Vec<&str> = self
            .filters
            .category_ids
            .iter()
            .filter_map(|id| Category::find_by_id(&self.categories, *id))
            .map(|category| category.name.as_str())
            .collect();

        let counts = format!("Showing {start}-{end} of {} products", self.total_items);
        if names.is_empty() {
            counts
        } else {
            format!("{counts} in {}", names.join(", "))
        }
    }

    /// Page strip for the current page.
    #[must_use]
    pub fn page_links(&self) -> Vec<PageLink> {
        page_window(self.page, self.total_pages)
    }
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if let Some(pos) = items.iter().position(|existing| *existing == item) {
        items.remove(pos);
    } else {
        items.push(item);
    }
}
