//! Product, variant and image records.

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, ImageId, Price, ProductId, VariantId};

/// A product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ImageId,
    pub product_id: ProductId,
    pub image_url: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// A purchasable variant (size/color combination) of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub price_override: Option<Price>,
}

/// A catalog product as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub base_price: Price,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

const fn default_true() -> bool {
    true
}

impl Product {
    /// The image to show for this product: the one flagged primary, else the
    /// first one.
    #[must_use]
    pub fn display_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|image| image.is_primary)
            .or_else(|| self.images.first())
    }

    /// Total stock across all variants.
    #[must_use]
    pub fn total_stock(&self) -> i64 {
        self.variants.iter().map(|v| v.stock_quantity).sum()
    }

    /// Whether any variant has stock.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.total_stock() > 0
    }

    /// Distinct variant colors, in first-seen order.
    #[must_use]
    pub fn colors(&self) -> Vec<&str> {
        distinct(self.variants.iter().filter_map(|v| v.color.as_deref()))
    }

    /// Distinct variant sizes, in first-seen order.
    #[must_use]
    pub fn sizes(&self) -> Vec<&str> {
        distinct(self.variants.iter().filter_map(|v| v.size.as_deref()))
    }

    /// Lowest and highest effective price across variants.
    ///
    /// Variants without an override sell at the base price. A product with no
    /// variants ranges over the base price alone.
    #[must_use]
    pub fn price_range(&self) -> (Price, Price) {
        let prices = self
            .variants
            .iter()
            .map(|v| v.price_override.unwrap_or(self.base_price));
        let min = prices.clone().min().unwrap_or(self.base_price);
        let max = prices.max().unwrap_or(self.base_price);
        (min, max)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Variant fields sent when creating or updating a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub stock_quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_override: Option<Price>,
}

impl From<&ProductVariant> for VariantDraft {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            sku: variant.sku.clone(),
            size: variant.size.clone(),
            color: variant.color.clone(),
            stock_quantity: variant.stock_quantity,
            price_override: variant.price_override,
        }
    }
}

/// Product fields edited by the admin product form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub base_price: Price,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub variants: Vec<VariantDraft>,
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            base_price: product.base_price,
            is_active: product.is_active,
            category_id: product.category_id,
            variants: product.variants.iter().map(VariantDraft::from).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product_json() -> serde_json::Value {
        serde_json::json!({
            "id": 10,
            "name": "Linen Shirt",
            "slug": "linen-shirt",
            "base_price": 1499.0,
            "is_active": true,
            "category_id": 1,
            "variants": [
                {"id": 1, "product_id": 10, "size": "M", "color": "White", "stock_quantity": 3},
                {"id": 2, "product_id": 10, "size": "L", "color": "White", "stock_quantity": 4,
                 "price_override": 1599.0},
                {"id": 3, "product_id": 10, "size": "M", "color": "Blue", "stock_quantity": 0}
            ],
            "images": [
                {"id": 5, "product_id": 10, "image_url": "/static/a.jpg", "is_primary": false},
                {"id": 6, "product_id": 10, "image_url": "/static/b.jpg", "is_primary": true}
            ]
        })
    }

    #[test]
    fn test_total_stock_sums_variants() {
        let product: Product = serde_json::from_value(product_json()).unwrap();
        assert_eq!(product.total_stock(), 7);
        assert!(product.in_stock());
    }

    #[test]
    fn test_display_image_prefers_primary() {
        let product: Product = serde_json::from_value(product_json()).unwrap();
        assert_eq!(product.display_image().unwrap().id, ImageId::new(6));
    }

    #[test]
    fn test_display_image_falls_back_to_first() {
        let mut product: Product = serde_json::from_value(product_json()).unwrap();
        for image in &mut product.images {
            image.is_primary = false;
        }
        assert_eq!(product.display_image().unwrap().id, ImageId::new(5));

        product.images.clear();
        assert!(product.display_image().is_none());
    }

    #[test]
    fn test_distinct_facets_keep_order() {
        let product: Product = serde_json::from_value(product_json()).unwrap();
        assert_eq!(product.colors(), vec!["White", "Blue"]);
        assert_eq!(product.sizes(), vec!["M", "L"]);
    }

    #[test]
    fn test_price_range_uses_overrides() {
        let product: Product = serde_json::from_value(product_json()).unwrap();
        let (min, max) = product.price_range();
        assert_eq!(min.to_string(), "$1499.00");
        assert_eq!(max.to_string(), "$1599.00");
    }

    #[test]
    fn test_draft_skips_absent_fields() {
        let product: Product = serde_json::from_value(product_json()).unwrap();
        let mut draft = ProductDraft::from(&product);
        draft.description = None;
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("description").is_none());
        assert_eq!(json["variants"][0]["stock_quantity"], 3);
        assert!(json["variants"][0].get("price_override").is_none());
    }
}
