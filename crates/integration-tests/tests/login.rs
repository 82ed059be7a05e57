//! Login and registration pages against the backend.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;

use catalogue_client::{REMEMBERED_EMAIL_KEY, SessionStore};
use catalogue_integration_tests::{CUSTOMER_EMAIL, CUSTOMER_PASSWORD, MockBackend};
use catalogue_storefront::auth::{
    LoginController, REGISTERED_NOTICE, RegisterController, RegistrationForm,
};

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

#[tokio::test]
async fn test_login_signs_in_and_redirects_home() {
    let backend = MockBackend::start().await.unwrap();
    let session = SessionStore::in_memory();
    let mut page = LoginController::mount(backend.client(session.clone()).unwrap(), "/login");

    assert!(page.submit(CUSTOMER_EMAIL, &secret(CUSTOMER_PASSWORD)).await);

    assert!(page.error().is_none());
    assert_eq!(page.location().to_string(), "/");
    let snapshot = session.snapshot();
    assert!(snapshot.is_authenticated);
    assert_eq!(snapshot.user.unwrap().email.as_str(), CUSTOMER_EMAIL);
    assert!(snapshot.access_token.is_some());
    assert_eq!(session.recall(REMEMBERED_EMAIL_KEY).as_deref(), Some(CUSTOMER_EMAIL));

    let sent = backend.requests_to("/login/access-token");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].bearer.is_none());
}

#[tokio::test]
async fn test_bad_credentials_show_backend_detail_and_stay_put() {
    let backend = MockBackend::start().await.unwrap();
    let session = SessionStore::in_memory();
    let mut page = LoginController::mount(backend.client(session.clone()).unwrap(), "/login");

    assert!(!page.submit(CUSTOMER_EMAIL, &secret("wrong")).await);

    assert_eq!(page.error(), Some("Invalid credentials"));
    assert_eq!(page.location().to_string(), "/login");
    assert!(!session.is_authenticated());
    assert!(session.token().is_none());
    assert_eq!(backend.state().refresh_calls, 0);
}

#[tokio::test]
async fn test_registration_leads_to_login_notice_and_first_sign_in() {
    let backend = MockBackend::start().await.unwrap();
    let session = SessionStore::in_memory();
    let api = backend.client(session.clone()).unwrap();

    let mut register = RegisterController::mount(api.clone(), "/register");
    let form = RegistrationForm {
        full_name: "Ravi Kumar".to_string(),
        email: "ravi@example.com".to_string(),
        password: secret("linen-season"),
        confirm_password: secret("linen-season"),
    };
    assert!(register.submit(&form).await);
    assert_eq!(register.location().to_string(), "/login?registered=true");
    assert!(!session.is_authenticated());

    let mut login = LoginController::mount(api, &register.location().to_string());
    assert_eq!(login.notice(), Some(REGISTERED_NOTICE));
    assert!(login.submit("ravi@example.com", &secret("linen-season")).await);
    assert_eq!(session.user().unwrap().full_name.as_deref(), Some("Ravi Kumar"));
}

#[tokio::test]
async fn test_duplicate_registration_shows_backend_detail() {
    let backend = MockBackend::start().await.unwrap();
    let api = backend.client(SessionStore::in_memory()).unwrap();
    let mut register = RegisterController::mount(api, "/register");
    let form = RegistrationForm {
        full_name: "Ana".to_string(),
        email: CUSTOMER_EMAIL.to_string(),
        password: secret("x"),
        confirm_password: secret("x"),
    };

    assert!(!register.submit(&form).await);

    assert_eq!(
        register.error(),
        Some("The user with this email already exists in the system")
    );
    assert_eq!(register.location().to_string(), "/register");
}

#[tokio::test]
async fn test_mismatched_confirmation_never_reaches_backend() {
    let backend = MockBackend::start().await.unwrap();
    let api = backend.client(SessionStore::in_memory()).unwrap();
    let mut register = RegisterController::mount(api, "/register");
    let form = RegistrationForm {
        full_name: "Ana".to_string(),
        email: "new@example.com".to_string(),
        password: secret("one"),
        confirm_password: secret("two"),
    };

    assert!(!register.submit(&form).await);

    assert!(register.error().is_some());
    assert!(backend.requests_to("/users/open").is_empty());
}
