//! Product search and admin product management.

use reqwest::Method;
use tracing::instrument;

use catalogue_core::{CategoryId, Paginated, Price, Product, ProductDraft, ProductId};

use super::{ApiClient, MultipartBody, Upload};
use crate::error::ApiError;

/// Filters and paging for `GET /products`.
///
/// The backend filters on a single color and a single size; only the first
/// selected value of each is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub category_ids: Vec<CategoryId>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub sort_by: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ProductQuery {
    /// Query parameters in the order the backend documents them.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(id) = self.category_id {
            params.push(("category_id", id.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size {
            params.push(("page_size", size.to_string()));
        }
        if !self.category_ids.is_empty() {
            let ids: Vec<String> = self.category_ids.iter().map(ToString::to_string).collect();
            params.push(("category_ids", ids.join(",")));
        }
        if let Some(min) = self.min_price {
            params.push(("min_price", min.amount().to_string()));
        }
        if let Some(max) = self.max_price {
            params.push(("max_price", max.amount().to_string()));
        }
        if let Some(color) = self.colors.first() {
            params.push(("color", color.clone()));
        }
        if let Some(size) = self.sizes.first() {
            params.push(("size", size.clone()));
        }
        if let Some(sort) = self.sort_by.as_deref().filter(|s| !s.is_empty()) {
            params.push(("sort_by", sort.to_string()));
        }
        params
    }
}

impl ApiClient {
    /// Search the catalog. Totals and page counts come from the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the page cannot be decoded.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &ProductQuery) -> Result<Paginated<Product>, ApiError> {
        self.get_json("/products", &query.to_params()).await
    }

    /// Fetch one product with its variants and images.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` (404) for an unknown product.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.get_json(&format!("/products/{id}"), &[]).await
    }

    /// Create a product with new image files. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's reason on rejection.
    #[instrument(skip(self, draft, images), fields(name = %draft.name))]
    pub async fn create_product(
        &self,
        draft: &ProductDraft,
        images: &[Upload],
    ) -> Result<Product, ApiError> {
        let body = product_body(draft, images)?;
        self.send_multipart(Method::POST, "/products", &body).await
    }

    /// Replace a product's fields and add image files. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's reason on rejection.
    #[instrument(skip(self, draft, images))]
    pub async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        images: &[Upload],
    ) -> Result<Product, ApiError> {
        let body = product_body(draft, images)?;
        self.send_multipart(Method::PUT, &format!("/products/{id}"), &body)
            .await
    }

    /// Delete a product. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's reason on rejection.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.delete_json(&format!("/products/{id}")).await
    }
}

fn product_body(draft: &ProductDraft, images: &[Upload]) -> Result<MultipartBody, ApiError> {
    Ok(MultipartBody::new()
        .text("name", &draft.name)
        .text("slug", &draft.slug)
        .text_opt("description", draft.description.as_ref())
        .text("base_price", draft.base_price.amount())
        .text("is_active", draft.is_active)
        .text_opt("category_id", draft.category_id)
        .json("variants", &draft.variants)?
        .files("images", images))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keys(params: &[(&'static str, String)]) -> Vec<&'static str> {
        params.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_default_query_sends_nothing() {
        assert!(ProductQuery::default().to_params().is_empty());
    }

    #[test]
    fn test_full_query() {
        let query = ProductQuery {
            search: Some("shirt".to_string()),
            category_ids: vec![CategoryId::new(1), CategoryId::new(3)],
            min_price: Some(Price::from_units(100)),
            max_price: Some(Price::from_units(2000)),
            colors: vec!["White".to_string(), "Blue".to_string()],
            sizes: vec!["M".to_string()],
            sort_by: Some("price_low".to_string()),
            page: Some(2),
            page_size: Some(12),
            ..ProductQuery::default()
        };
        let params = query.to_params();
        assert_eq!(
            keys(&params),
            vec![
                "search",
                "page",
                "page_size",
                "category_ids",
                "min_price",
                "max_price",
                "color",
                "size",
                "sort_by"
            ]
        );
        let lookup = |key: &str| params.iter().find(|(k, _)| *k == key).unwrap().1.clone();
        assert_eq!(lookup("category_ids"), "1,3");
        assert_eq!(lookup("color"), "White");
        assert_eq!(lookup("max_price"), "2000");
    }

    #[test]
    fn test_empty_search_is_omitted() {
        let query = ProductQuery {
            search: Some(String::new()),
            ..ProductQuery::default()
        };
        assert!(query.to_params().is_empty());
    }

    #[test]
    fn test_product_body_encodes_variants_as_json() {
        let draft: ProductDraft = serde_json::from_value(serde_json::json!({
            "name": "Linen Shirt", "slug": "linen-shirt", "base_price": 1499.5,
            "is_active": true, "category_id": 4,
            "variants": [{"size": "M", "stock_quantity": 3}]
        }))
        .unwrap();
        let body = product_body(&draft, &[Upload::new("a.jpg", vec![1])]).unwrap();

        assert_eq!(body.field("base_price"), Some("1499.5"));
        assert_eq!(body.field("category_id"), Some("4"));
        assert!(body.field("description").is_none());
        assert_eq!(body.field("variants"), Some(r#"[{"size":"M","stock_quantity":3}]"#));
        assert_eq!(body.file_count(), 1);
    }
}
