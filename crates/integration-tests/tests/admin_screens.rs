//! Admin console screens against the backend.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;

use catalogue_admin::screens::{CustomersScreen, ProductsScreen, dashboard};
use catalogue_admin::{AdminAccess, AutoConfirm, CrudError, check_access};
use catalogue_client::{ApiClient, SessionStore};
use catalogue_core::{ProductId, UserId};
use catalogue_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, CUSTOMER_EMAIL, CUSTOMER_PASSWORD, MockBackend, PRODUCT_COUNT,
};
use catalogue_storefront::auth::LoginController;

async fn signed_in(backend: &MockBackend, email: &str, password: &str) -> ApiClient {
    let api = backend.client(SessionStore::in_memory()).unwrap();
    let mut login = LoginController::mount(api.clone(), "/login");
    assert!(login.submit(email, &SecretString::from(password.to_string())).await);
    api
}

#[tokio::test]
async fn test_access_follows_the_signed_in_user() {
    let backend = MockBackend::start().await.unwrap();

    let anonymous = backend.client(SessionStore::in_memory()).unwrap();
    assert_eq!(check_access(anonymous.session()), AdminAccess::SignInRequired);

    let customer = signed_in(&backend, CUSTOMER_EMAIL, CUSTOMER_PASSWORD).await;
    assert_eq!(check_access(customer.session()), AdminAccess::Forbidden);

    let admin = signed_in(&backend, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(check_access(admin.session()), AdminAccess::Granted);
}

#[tokio::test]
async fn test_dashboard_stats() {
    let backend = MockBackend::start().await.unwrap();
    let admin = signed_in(&backend, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let stats = dashboard::load_stats(&admin).await.unwrap();

    assert_eq!(stats.total_products, u64::try_from(PRODUCT_COUNT).unwrap());
    assert_eq!(stats.total_users, 2);
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let backend = MockBackend::start().await.unwrap();
    let screen = ProductsScreen::new(signed_in(&backend, ADMIN_EMAIL, ADMIN_PASSWORD).await);
    screen.load().await;
    assert_eq!(screen.products().len(), 12);

    let err = screen
        .delete(ProductId::new(1), &AutoConfirm(false))
        .await
        .unwrap_err();

    assert!(matches!(err, CrudError::Cancelled));
    assert!(
        backend
            .state()
            .requests
            .iter()
            .all(|request| request.method != "DELETE")
    );
}

#[tokio::test]
async fn test_confirmed_delete_reloads_the_list() {
    let backend = MockBackend::start().await.unwrap();
    let screen = ProductsScreen::new(signed_in(&backend, ADMIN_EMAIL, ADMIN_PASSWORD).await);
    screen.load().await;

    screen
        .delete(ProductId::new(1), &AutoConfirm(true))
        .await
        .unwrap();

    assert_eq!(screen.total(), u64::try_from(PRODUCT_COUNT - 1).unwrap());
    assert!(screen.products().iter().all(|product| product.id != ProductId::new(1)));
    assert!(!screen.crud().is_pending(ProductId::new(1)));
    assert!(screen.crud().alert().is_none());
}

#[tokio::test]
async fn test_rejected_delete_raises_backend_detail() {
    let backend = MockBackend::start().await.unwrap();
    let screen = ProductsScreen::new(signed_in(&backend, ADMIN_EMAIL, ADMIN_PASSWORD).await);

    let err = screen
        .delete(ProductId::new(999), &AutoConfirm(true))
        .await
        .unwrap_err();

    assert_eq!(err.alert(), Some("Product not found"));
    assert_eq!(screen.crud().alert().as_deref(), Some("Product not found"));
    assert!(!screen.crud().is_pending(ProductId::new(999)));
}

#[tokio::test]
async fn test_paging_through_products() {
    let backend = MockBackend::start().await.unwrap();
    let screen = ProductsScreen::new(signed_in(&backend, ADMIN_EMAIL, ADMIN_PASSWORD).await);
    screen.load().await;
    assert_eq!(screen.total_pages(), 3);

    screen.go_to_page(9).await;
    assert_eq!(screen.page(), 3);
    assert_eq!(screen.products().len(), 6);

    screen.previous_page().await;
    assert_eq!(screen.page(), 2);
}

#[tokio::test]
async fn test_toggle_admin_flips_role() {
    let backend = MockBackend::start().await.unwrap();
    let screen = CustomersScreen::new(signed_in(&backend, ADMIN_EMAIL, ADMIN_PASSWORD).await);
    screen.load().await;
    assert_eq!(screen.users().len(), 2);

    let user = screen.toggle_admin(UserId::new(1)).await.unwrap();

    assert!(user.is_superuser);
    let listed = screen.users();
    assert!(listed.iter().any(|u| u.id == UserId::new(1) && u.is_superuser));
}

#[tokio::test]
async fn test_customer_cannot_list_users() {
    let backend = MockBackend::start().await.unwrap();
    let screen = CustomersScreen::new(signed_in(&backend, CUSTOMER_EMAIL, CUSTOMER_PASSWORD).await);

    screen.load().await;

    assert!(screen.users().is_empty());
}
