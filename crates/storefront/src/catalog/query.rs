//! Catalog view state and its query-string form.
//!
//! [`CatalogQuery`] is what the URL says (category slugs, raw facets);
//! [`CatalogFilters`] is what the controller filters by (category ids). Both
//! conversions are pure so a shared link reproduces the same view:
//! `filters -> query -> location -> query -> filters` is the identity for any
//! category that exists.

use core::fmt;
use core::str::FromStr;

use catalogue_client::ProductQuery;
use catalogue_core::{Category, CategoryId, Price};

use crate::navigation::Location;

/// Products per catalog page.
pub const ITEMS_PER_PAGE: u32 = 12;

/// Upper bound of the price slider; a ceiling at this value means "no limit".
pub const PRICE_CEILING: u32 = 50_000;

/// Catalog ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Newest,
}

impl SortKey {
    pub const ALL: [Self; 4] = [Self::Featured, Self::PriceLow, Self::PriceHigh, Self::Newest];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLow => "price_low",
            Self::PriceHigh => "price_high",
            Self::Newest => "newest",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
            Self::Newest => "Newest",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| format!("unknown sort key `{s}`"))
    }
}

// =============================================================================
// URL form
// =============================================================================

/// Catalog state as carried by the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: String,
    /// Lowercased category slugs.
    pub category_slugs: Vec<String>,
    /// The slugs came from the legacy singular `category` parameter.
    pub legacy_category: bool,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub max_price: u32,
    pub page: u32,
    pub sort: SortKey,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category_slugs: Vec::new(),
            legacy_category: false,
            colors: Vec::new(),
            sizes: Vec::new(),
            max_price: PRICE_CEILING,
            page: 1,
            sort: SortKey::Featured,
        }
    }
}

impl CatalogQuery {
    /// Read catalog state from a location. Malformed values fall back to
    /// their defaults; a singular `category` wins over `categories`.
    #[must_use]
    pub fn from_location(location: &Location) -> Self {
        let defaults = Self::default();

        let (category_slugs, legacy_category) = match location
            .get("category")
            .map(|slug| slug.trim().to_lowercase())
            .filter(|slug| !slug.is_empty())
        {
            Some(slug) => (vec![slug], true),
            None => (
                split_list(location.get("categories"))
                    .into_iter()
                    .map(|slug| slug.to_lowercase())
                    .collect(),
                false,
            ),
        };

        Self {
            search: location.get("search").unwrap_or_default().to_string(),
            category_slugs,
            legacy_category,
            colors: split_list(location.get("colors")),
            sizes: split_list(location.get("sizes")),
            max_price: location
                .get("max_price")
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(defaults.max_price),
            page: location
                .get("page")
                .and_then(|raw| raw.trim().parse().ok())
                .filter(|page: &u32| *page > 0)
                .unwrap_or(defaults.page),
            sort: location
                .get("sort")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.sort),
        }
    }

    /// Write this state into `location`, leaving unrelated parameters alone.
    ///
    /// Defaults (no search, featured sort, page 1, the price ceiling) are
    /// removed rather than written. Always writes the plural `categories`
    /// form.
    pub fn write_to(&self, location: &mut Location) {
        set_or_delete(location, "search", (!self.search.is_empty()).then(|| self.search.clone()));
        location.delete("category");
        set_or_delete(location, "categories", join_list(&self.category_slugs));
        set_or_delete(location, "colors", join_list(&self.colors));
        set_or_delete(location, "sizes", join_list(&self.sizes));
        set_or_delete(
            location,
            "max_price",
            (self.max_price != PRICE_CEILING).then(|| self.max_price.to_string()),
        );
        set_or_delete(
            location,
            "sort",
            (self.sort != SortKey::Featured).then(|| self.sort.to_string()),
        );
        set_or_delete(location, "page", (self.page > 1).then(|| self.page.to_string()));
    }

    /// A fresh location at `path` carrying only this state.
    #[must_use]
    pub fn to_location(&self, path: &str) -> Location {
        let mut location = Location::new(path);
        self.write_to(&mut location);
        location
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_list(items: &[String]) -> Option<String> {
    (!items.is_empty()).then(|| items.join(","))
}

fn set_or_delete(location: &mut Location, key: &str, value: Option<String>) {
    match value {
        Some(value) => location.set(key, value),
        None => location.delete(key),
    }
}

// =============================================================================
// Controller form
// =============================================================================

/// The filters the catalog applies, with categories resolved to ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFilters {
    pub search: String,
    pub category_ids: Vec<CategoryId>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub max_price: u32,
    pub sort: SortKey,
}

impl Default for CatalogFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            category_ids: Vec::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
            max_price: PRICE_CEILING,
            sort: SortKey::Featured,
        }
    }
}

impl CatalogFilters {
    /// Resolve the URL's slugs against `categories` (case-insensitive,
    /// children included). Unknown slugs are dropped.
    #[must_use]
    pub fn resolve(query: &CatalogQuery, categories: &[Category]) -> Self {
        let mut category_ids: Vec<CategoryId> = Vec::new();
        for slug in &query.category_slugs {
            if let Some(category) = Category::find_by_slug(categories, slug)
                && !category_ids.contains(&category.id)
            {
                category_ids.push(category.id);
            }
        }

        Self {
            search: query.search.clone(),
            category_ids,
            colors: query.colors.clone(),
            sizes: query.sizes.clone(),
            max_price: query.max_price,
            sort: query.sort,
        }
    }

    /// The URL form of these filters at `page`.
    #[must_use]
    pub fn to_query(&self, page: u32, categories: &[Category]) -> CatalogQuery {
        CatalogQuery {
            search: self.search.clone(),
            category_slugs: self
                .category_ids
                .iter()
                .filter_map(|id| Category::find_by_id(categories, *id))
                .map(|category| category.slug.to_lowercase())
                .collect(),
            legacy_category: false,
            colors: self.colors.clone(),
            sizes: self.sizes.clone(),
            max_price: self.max_price,
            page,
            sort: self.sort,
        }
    }

    /// Backend query for `page` of these filters.
    #[must_use]
    pub fn to_product_query(&self, page: u32) -> ProductQuery {
        ProductQuery {
            search: (!self.search.is_empty()).then(|| self.search.clone()),
            category_ids: self.category_ids.clone(),
            max_price: (self.max_price < PRICE_CEILING)
                .then(|| Price::from_units(i64::from(self.max_price))),
            colors: self.colors.clone(),
            sizes: self.sizes.clone(),
            sort_by: (self.sort != SortKey::Featured).then(|| self.sort.to_string()),
            page: Some(page),
            page_size: Some(ITEMS_PER_PAGE),
            ..ProductQuery::default()
        }
    }

    /// Whether anything besides the search term narrows the list.
    #[must_use]
    pub fn has_facets(&self) -> bool {
        !self.category_ids.is_empty()
            || !self.colors.is_empty()
            || !self.sizes.is_empty()
            || self.max_price != PRICE_CEILING
            || self.sort != SortKey::Featured
    }

    /// These filters with every facet cleared and the search term kept.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            search: self.search.clone(),
            ..Self::default()
        }
    }
}
