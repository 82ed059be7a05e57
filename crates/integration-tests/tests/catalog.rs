//! Catalog page: URL sync, legacy parameters and pagination.

#![allow(clippy::unwrap_used)]

use catalogue_client::SessionStore;
use catalogue_core::CategoryId;
use catalogue_integration_tests::{MockBackend, PRODUCT_COUNT};
use catalogue_storefront::Storefront;
use catalogue_storefront::catalog::SortKey;

fn storefront(backend: &MockBackend) -> Storefront {
    Storefront::new(backend.client(SessionStore::in_memory()).unwrap())
}

#[tokio::test]
async fn test_legacy_category_param_is_rewritten_in_place() {
    let backend = MockBackend::start().await.unwrap();
    let shop = storefront(&backend);

    let catalog = shop.catalog("/catalog?category=men").await;

    assert_eq!(catalog.filters().category_ids, vec![CategoryId::new(1)]);
    assert_eq!(catalog.location().to_string(), "/catalog?categories=men");
    assert_eq!(catalog.navigator().history().len(), 1);

    let sent = backend.requests_to("/products");
    assert_eq!(sent.len(), 1);
    let query = sent[0].query.as_deref().unwrap();
    assert!(query.contains("category_ids=1"), "{query}");
    assert!(query.contains("page=1"), "{query}");
    assert!(query.contains("page_size=12"), "{query}");
}

#[tokio::test]
async fn test_child_category_slug_resolves() {
    let backend = MockBackend::start().await.unwrap();
    let shop = storefront(&backend);

    let catalog = shop.catalog("/catalog?categories=MEN-SHIRTS,unknown").await;

    assert_eq!(catalog.filters().category_ids, vec![CategoryId::new(3)]);
    assert_eq!(catalog.navigator().history().len(), 1);
}

#[tokio::test]
async fn test_clear_filters_keeps_search() {
    let backend = MockBackend::start().await.unwrap();
    let shop = storefront(&backend);
    let mut catalog = shop
        .catalog(
            "/catalog?search=shirt&categories=women&colors=Blue&sort=price_low&page=2&utm_source=mail",
        )
        .await;
    assert_eq!(catalog.page(), 2);

    catalog.clear_filters().await;

    assert_eq!(catalog.location().to_string(), "/catalog?search=shirt");
    assert_eq!(catalog.page(), 1);
    assert_eq!(catalog.filters().sort, SortKey::Featured);
    assert!(!catalog.filters().has_facets());
    assert_eq!(catalog.navigator().history().len(), 2);
}

#[tokio::test]
async fn test_out_of_range_pages_are_ignored() {
    let backend = MockBackend::start().await.unwrap();
    let shop = storefront(&backend);
    let mut catalog = shop.catalog("/catalog").await;
    assert_eq!(catalog.total_pages(), 3);
    assert_eq!(catalog.total_items(), u64::try_from(PRODUCT_COUNT).unwrap());

    assert!(!catalog.go_to_page(0).await);
    assert!(!catalog.go_to_page(4).await);
    assert_eq!(catalog.page(), 1);
    assert_eq!(catalog.navigator().history().len(), 1);
    assert_eq!(backend.requests_to("/products").len(), 1);

    assert!(catalog.go_to_page(3).await);
    assert_eq!(catalog.location().to_string(), "/catalog?page=3");
    assert_eq!(catalog.products().len(), PRODUCT_COUNT - 24);
    assert_eq!(catalog.summary(), "Showing 25-30 of 30 products");
}

#[tokio::test]
async fn test_link_past_the_last_page_shows_the_last_page() {
    let backend = MockBackend::start().await.unwrap();
    let shop = storefront(&backend);

    let catalog = shop.catalog("/catalog?page=4294967295").await;

    assert_eq!(catalog.page(), 3);
    assert_eq!(catalog.location().to_string(), "/catalog?page=3");
    assert_eq!(catalog.navigator().history().len(), 1);
    assert_eq!(catalog.products().len(), PRODUCT_COUNT - 24);
    assert_eq!(catalog.summary(), "Showing 25-30 of 30 products");
    let links: Vec<String> = catalog.page_links().iter().map(ToString::to_string).collect();
    assert_eq!(links, ["1", "2", "3"]);

    let sent = backend.requests_to("/products");
    assert_eq!(sent.len(), 2);
    assert!(sent[1].query.as_deref().unwrap().contains("page=3"));
}

#[tokio::test]
async fn test_failed_search_empties_the_grid() {
    let backend = MockBackend::start().await.unwrap();
    let shop = storefront(&backend);
    let mut catalog = shop.catalog("/catalog?page=2").await;
    assert_eq!(catalog.products().len(), 12);
    assert_eq!(catalog.total_pages(), 3);

    backend.state().products_fail = true;
    catalog.toggle_color("Blue").await;

    assert!(catalog.products().is_empty());
    assert_eq!(catalog.total_pages(), 1);
    assert_eq!(catalog.total_items(), 0);
    assert_eq!(catalog.page(), 1);
    assert_eq!(catalog.location().to_string(), "/catalog?colors=Blue");
    assert_eq!(catalog.summary(), "Showing 0-0 of 0 products");
}

#[tokio::test]
async fn test_filter_change_resets_page_and_pushes_history() {
    let backend = MockBackend::start().await.unwrap();
    let shop = storefront(&backend);
    let mut catalog = shop.catalog("/catalog?page=2").await;

    catalog.toggle_category(CategoryId::new(1)).await;

    assert_eq!(catalog.page(), 1);
    assert_eq!(catalog.location().to_string(), "/catalog?categories=men");
    assert_eq!(catalog.navigator().history().len(), 2);
    assert_eq!(catalog.summary(), "Showing 1-12 of 30 products in Men");
}

#[tokio::test]
async fn test_shared_link_reproduces_the_view() {
    let backend = MockBackend::start().await.unwrap();
    let shop = storefront(&backend);
    let mut catalog = shop.catalog("/catalog").await;
    catalog.set_search("linen").await;
    catalog.toggle_category(CategoryId::new(3)).await;
    catalog.toggle_color("Blue").await;
    catalog.toggle_size("M").await;
    catalog.set_max_price(2000).await;
    catalog.set_sort(SortKey::PriceHigh).await;

    let link = catalog.location().to_string();
    let reopened = shop.catalog(&link).await;

    assert_eq!(reopened.filters(), catalog.filters());
    assert_eq!(reopened.location().to_string(), link);
}
