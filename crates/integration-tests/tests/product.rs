//! Product detail page.

#![allow(clippy::unwrap_used)]

use catalogue_client::SessionStore;
use catalogue_core::ProductId;
use catalogue_integration_tests::MockBackend;
use catalogue_storefront::product::{PLACEHOLDER_IMAGE, ProductDetail, RELATED_LIMIT};

#[tokio::test]
async fn test_detail_suggests_other_products() {
    let backend = MockBackend::start().await.unwrap();
    let api = backend.client(SessionStore::in_memory()).unwrap();

    let detail = ProductDetail::load(&api, ProductId::new(2)).await.unwrap();

    assert_eq!(detail.product.name, "Linen Shirt 2");
    assert_eq!(detail.image_urls, [PLACEHOLDER_IMAGE]);
    assert_eq!(detail.total_stock(), 3);
    assert_eq!(detail.related.len(), RELATED_LIMIT);
    let related: Vec<ProductId> = detail.related.iter().map(|product| product.id).collect();
    assert_eq!(related, [1, 3, 4, 5].map(ProductId::new));
    assert_eq!(backend.requests_to("/products").len(), 1);
    assert_eq!(backend.requests_to("/products/2").len(), 1);
}

#[tokio::test]
async fn test_detail_loads_without_suggestions() {
    let backend = MockBackend::start().await.unwrap();
    backend.state().products_fail = true;
    let api = backend.client(SessionStore::in_memory()).unwrap();

    let detail = ProductDetail::load(&api, ProductId::new(7)).await.unwrap();

    assert_eq!(detail.product.id, ProductId::new(7));
    assert!(detail.related.is_empty());
}

#[tokio::test]
async fn test_unknown_product_is_an_error() {
    let backend = MockBackend::start().await.unwrap();
    let api = backend.client(SessionStore::in_memory()).unwrap();

    assert!(ProductDetail::load(&api, ProductId::new(999)).await.is_err());
}
