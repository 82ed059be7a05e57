//! Refresh and retry behaviour of the API client's interceptor.

#![allow(clippy::unwrap_used)]

use catalogue_client::{AccessToken, ApiError, SessionStore};
use catalogue_core::User;
use catalogue_integration_tests::{CUSTOMER_EMAIL, MockBackend, jwt_expiring_in};

fn customer(backend: &MockBackend) -> User {
    serde_json::from_value(backend.user_json(CUSTOMER_EMAIL).unwrap()).unwrap()
}

/// A session signed in as the seeded customer with `token`.
fn signed_in(backend: &MockBackend, token: &str) -> SessionStore {
    let session = SessionStore::in_memory();
    session.login(customer(backend), AccessToken::new(token));
    session
}

#[tokio::test]
async fn test_expiring_token_is_refreshed_before_sending() {
    let backend = MockBackend::start().await.unwrap();
    let stale = jwt_expiring_in("soon", 60);
    backend.accept_token(&stale, CUSTOMER_EMAIL);
    let session = signed_in(&backend, &stale);
    let api = backend.client(session.clone()).unwrap();

    let user = api.get_profile().await.unwrap();

    assert_eq!(user.email.as_str(), CUSTOMER_EMAIL);
    assert_eq!(backend.state().refresh_calls, 1);
    let sent = backend.requests_to("/users/me");
    assert_eq!(sent.len(), 1);
    assert_ne!(sent[0].bearer.as_deref(), Some(stale.as_str()));
    assert_eq!(sent[0].bearer.as_deref(), session.token().as_ref().map(AccessToken::expose));
}

#[tokio::test]
async fn test_fresh_token_is_sent_without_refreshing() {
    let backend = MockBackend::start().await.unwrap();
    let token = backend.issue_token(CUSTOMER_EMAIL);
    let api = backend.client(signed_in(&backend, &token)).unwrap();

    api.get_profile().await.unwrap();

    assert_eq!(backend.state().refresh_calls, 0);
    assert_eq!(
        backend.requests_to("/users/me")[0].bearer.as_deref(),
        Some(token.as_str())
    );
}

#[tokio::test]
async fn test_401_triggers_one_refresh_and_one_resubmission() {
    let backend = MockBackend::start().await.unwrap();
    let token = backend.issue_token(CUSTOMER_EMAIL);
    backend.revoke_token(&token);
    let session = signed_in(&backend, &token);
    let api = backend.client(session.clone()).unwrap();

    let user = api.get_profile().await.unwrap();

    assert_eq!(user.email.as_str(), CUSTOMER_EMAIL);
    assert_eq!(backend.state().refresh_calls, 1);
    let sent = backend.requests_to("/users/me");
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].bearer.as_deref(), Some(token.as_str()));
    assert_ne!(sent[1].bearer, sent[0].bearer);
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_401_on_resubmission_is_returned_without_second_refresh() {
    let backend = MockBackend::start().await.unwrap();
    let token = backend.issue_token(CUSTOMER_EMAIL);
    backend.state().reject_all_tokens = true;
    let api = backend.client(signed_in(&backend, &token)).unwrap();

    let err = api.get_profile().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(backend.state().refresh_calls, 1);
    assert_eq!(backend.requests_to("/users/me").len(), 2);
}

#[tokio::test]
async fn test_failed_refresh_clears_the_session() {
    let backend = MockBackend::start().await.unwrap();
    let token = backend.issue_token(CUSTOMER_EMAIL);
    backend.revoke_token(&token);
    backend.state().refresh_fails = true;
    let session = signed_in(&backend, &token);
    let api = backend.client(session.clone()).unwrap();

    let err = api.get_profile().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
    assert!(session.user().is_none());
    assert_eq!(backend.requests_to("/users/me").len(), 1);
}

#[tokio::test]
async fn test_failed_refresh_before_send_goes_out_unauthenticated() {
    let backend = MockBackend::start().await.unwrap();
    let stale = jwt_expiring_in("soon", 10);
    backend.accept_token(&stale, CUSTOMER_EMAIL);
    backend.state().refresh_fails = true;
    let session = signed_in(&backend, &stale);
    let api = backend.client(session.clone()).unwrap();

    let categories = api.list_categories().await.unwrap();

    assert_eq!(categories.len(), 2);
    assert!(!session.is_authenticated());
    assert!(backend.requests_to("/categories")[0].bearer.is_none());
}

#[tokio::test]
async fn test_concurrent_requests_share_one_refresh() {
    let backend = MockBackend::start().await.unwrap();
    let stale = jwt_expiring_in("soon", 30);
    backend.accept_token(&stale, CUSTOMER_EMAIL);
    let session = signed_in(&backend, &stale);
    let api = backend.client(session.clone()).unwrap();

    let (a, b, c) = tokio::join!(api.get_profile(), api.get_profile(), api.get_wishlist());

    a.unwrap();
    b.unwrap();
    c.unwrap();
    assert_eq!(backend.state().refresh_calls, 1);
    let fresh = session.token().unwrap();
    for request in backend.requests_to("/users/me") {
        assert_eq!(request.bearer.as_deref(), Some(fresh.expose()));
    }
}

#[tokio::test]
async fn test_anonymous_session_sends_no_bearer() {
    let backend = MockBackend::start().await.unwrap();
    let api = backend.client(SessionStore::in_memory()).unwrap();

    let err = api.get_profile().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(backend.state().refresh_calls, 0);
    assert!(backend.requests_to("/users/me")[0].bearer.is_none());
}
