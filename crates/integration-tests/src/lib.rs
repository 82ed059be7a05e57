//! Integration tests for the catalogue client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalogue-integration-tests
//! ```
//!
//! Each test starts a [`MockBackend`]: an `axum` server on an ephemeral
//! localhost port speaking the subset of the backend API the client uses. It
//! records every request so tests can check what went over the wire
//! (bearer tokens, query strings, how many refreshes happened).
//!
//! # Test Categories
//!
//! - `auth_interceptor` - Token refresh before send, single retry on 401
//! - `login` - Login and registration pages
//! - `catalog` - Catalog URL sync and pagination
//! - `product` - Product detail page
//! - `store_settings` - Public store settings and the settings form
//! - `admin_screens` - CRUD discipline against the backend

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use catalogue_client::{ApiClient, ApiError, ClientConfig, SessionStore};

/// Seeded customer account.
pub const CUSTOMER_EMAIL: &str = "ana@example.com";
pub const CUSTOMER_PASSWORD: &str = "correct-horse";

/// Seeded admin account.
pub const ADMIN_EMAIL: &str = "ops@example.com";
pub const ADMIN_PASSWORD: &str = "battery-staple";

/// Number of seeded products.
pub const PRODUCT_COUNT: usize = 30;

/// Build an unsigned JWT for `subject` expiring `secs` from now.
#[must_use]
pub fn jwt_expiring_in(subject: &str, secs: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + secs;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = URL_SAFE_NO_PAD.encode(json!({ "sub": subject, "exp": exp }).to_string());
    format!("{header}.{claims}.mock")
}

/// One request as the backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path below `/api/v1`.
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user: Value,
}

/// Mutable backend state, shared with the handlers.
#[derive(Debug, Default)]
pub struct BackendState {
    accounts: HashMap<String, Account>,
    /// Token to account email.
    tokens: HashMap<String, String>,
    /// Tokens rejected by resource endpoints but still accepted for refresh.
    revoked: HashSet<String>,
    issued: usize,
    /// Refresh requests answered with 401.
    pub refresh_fails: bool,
    /// Every bearer token is rejected, fresh ones included.
    pub reject_all_tokens: bool,
    /// Product searches answered with 500.
    pub products_fail: bool,
    pub refresh_calls: usize,
    pub requests: Vec<RecordedRequest>,
    categories: Value,
    products: Vec<Value>,
    wishlist: Vec<Value>,
    settings: Vec<Value>,
    users_next_id: i64,
}

type Shared = Arc<Mutex<BackendState>>;

fn lock(state: &Shared) -> MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BackendState {
    fn seeded() -> Self {
        let mut state = Self {
            users_next_id: 3,
            ..Self::default()
        };
        state.accounts.insert(
            CUSTOMER_EMAIL.to_string(),
            Account {
                password: CUSTOMER_PASSWORD.to_string(),
                user: json!({
                    "id": 1, "email": CUSTOMER_EMAIL, "full_name": "Ana Silva",
                    "is_active": true, "is_superuser": false
                }),
            },
        );
        state.accounts.insert(
            ADMIN_EMAIL.to_string(),
            Account {
                password: ADMIN_PASSWORD.to_string(),
                user: json!({
                    "id": 2, "email": ADMIN_EMAIL, "full_name": "Ops",
                    "is_active": true, "is_superuser": true
                }),
            },
        );
        state.categories = json!([
            {"id": 1, "name": "Men", "slug": "men", "is_active": true, "children": [
                {"id": 3, "name": "Shirts", "slug": "men-shirts", "parent_id": 1, "is_active": true}
            ]},
            {"id": 2, "name": "Women", "slug": "women", "is_active": true}
        ]);
        state.products = (1..=PRODUCT_COUNT)
            .map(|n| {
                json!({
                    "id": n, "name": format!("Linen Shirt {n}"), "slug": format!("linen-shirt-{n}"),
                    "base_price": 1499.0 + f64::from(u32::try_from(n).unwrap_or(0)),
                    "is_active": true, "category_id": 1,
                    "variants": [{"id": n, "product_id": n, "size": "M", "color": "Blue", "stock_quantity": 3}],
                    "images": []
                })
            })
            .collect();
        state.settings = vec![
            json!({"id": 1, "key": "store_name", "value": "Linen House", "value_type": "string", "category": "general"}),
            json!({"id": 2, "key": "currency_symbol", "value": "$", "value_type": "string", "category": "general"}),
            json!({"id": 3, "key": "maintenance_mode", "value": "false", "value_type": "boolean", "category": "general"}),
            json!({"id": 4, "key": "low_stock_threshold", "value": "7", "value_type": "integer", "category": "products"}),
        ];
        state
    }

    /// Issue a token for `email` expiring in an hour.
    fn issue(&mut self, email: &str) -> String {
        self.issued += 1;
        let token = jwt_expiring_in(&format!("{email}#{}", self.issued), 3600);
        self.tokens.insert(token.clone(), email.to_string());
        token
    }

    fn account_for(&self, bearer: Option<&str>) -> Option<&Account> {
        let bearer = bearer?;
        if self.reject_all_tokens || self.revoked.contains(bearer) {
            return None;
        }
        let email = self.tokens.get(bearer)?;
        self.accounts.get(email)
    }
}

/// In-process backend on an ephemeral localhost port. Stops when dropped.
pub struct MockBackend {
    api_url: Url,
    state: Shared,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start a backend seeded with two accounts, a category tree,
    /// [`PRODUCT_COUNT`] products and a few site settings.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state: Shared = Arc::new(Mutex::new(BackendState::seeded()));

        let api = Router::new()
            .route("/login/access-token", post(login_access_token))
            .route("/login/refresh-token", post(refresh_token))
            .route("/users/open", post(register))
            .route("/users/me", get(me))
            .route("/users", get(list_users))
            .route("/users/{id}", put(update_user))
            .route("/categories", get(list_categories))
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product).delete(delete_product))
            .route("/wishlist", get(get_wishlist).post(add_to_wishlist))
            .route("/wishlist/{product_id}", delete(remove_from_wishlist))
            .route("/admin/stats", get(admin_stats))
            .route("/settings", get(list_settings))
            .route("/settings/bulk-update", post(bulk_update_settings))
            .route("/settings/public/general", get(public_settings))
            .route("/settings/{key}", get(get_setting).put(update_setting))
            .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
            .with_state(Arc::clone(&state));
        let app = Router::new().nest("/api/v1", api);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let api_url = Url::parse(&format!("http://{addr}/api/v1"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        Ok(Self {
            api_url,
            state,
            server,
        })
    }

    #[must_use]
    pub const fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// A client for this backend over `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn client(&self, session: SessionStore) -> Result<ApiClient, ApiError> {
        ApiClient::new(&ClientConfig::new(self.api_url.clone()), session)
    }

    /// Inspect or change backend state.
    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        lock(&self.state)
    }

    /// Issue a valid token for a seeded account, as a login would.
    #[must_use]
    pub fn issue_token(&self, email: &str) -> String {
        self.state().issue(email)
    }

    /// Register `token` as valid for `email` (e.g. one built with
    /// [`jwt_expiring_in`]).
    pub fn accept_token(&self, token: &str, email: &str) {
        self.state()
            .tokens
            .insert(token.to_string(), email.to_string());
    }

    /// Reject `token` on every endpoint except `/login/refresh-token`, the
    /// way an expired token is treated.
    pub fn revoke_token(&self, token: &str) {
        self.state().revoked.insert(token.to_string());
    }

    /// Requests received so far whose path is `path`.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.state()
            .requests
            .iter()
            .filter(|request| request.path == path)
            .cloned()
            .collect()
    }

    /// Seeded user record for `email`.
    #[must_use]
    pub fn user_json(&self, email: &str) -> Option<Value> {
        self.state()
            .accounts
            .get(email)
            .map(|account| account.user.clone())
    }

    /// Stored record for setting `key`.
    #[must_use]
    pub fn setting_json(&self, key: &str) -> Option<Value> {
        self.state()
            .settings
            .iter()
            .find(|setting| setting["key"] == key)
            .cloned()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: path.strip_prefix("/api/v1").unwrap_or(path).to_string(),
        query: request.uri().query().map(str::to_string),
        bearer: bearer(request.headers()).map(str::to_string),
    };
    lock(&state).requests.push(recorded);
    next.run(request).await
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn unauthorized() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login_access_token(State(state): State<Shared>, Json(body): Json<Credentials>) -> Response {
    let mut state = lock(&state);
    let valid = state
        .accounts
        .get(&body.email)
        .is_some_and(|account| account.password == body.password);
    if !valid {
        return detail(StatusCode::BAD_REQUEST, "Invalid credentials");
    }
    let token = state.issue(&body.email);
    Json(json!({ "access_token": token, "token_type": "bearer" })).into_response()
}

async fn refresh_token(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&state);
    state.refresh_calls += 1;
    if state.refresh_fails {
        return unauthorized();
    }
    // Revoked tokens may still be exchanged as long as they were issued here.
    let Some(email) = bearer(&headers).and_then(|token| state.tokens.get(token).cloned()) else {
        return unauthorized();
    };
    let token = state.issue(&email);
    Json(json!({ "access_token": token, "token_type": "bearer" })).into_response()
}

#[derive(Deserialize)]
struct Registration {
    email: String,
    password: String,
    full_name: String,
}

async fn register(State(state): State<Shared>, Json(body): Json<Registration>) -> Response {
    let mut state = lock(&state);
    if state.accounts.contains_key(&body.email) {
        return detail(
            StatusCode::BAD_REQUEST,
            "The user with this email already exists in the system",
        );
    }
    let id = state.users_next_id;
    state.users_next_id += 1;
    let user = json!({
        "id": id, "email": body.email, "full_name": body.full_name,
        "is_active": true, "is_superuser": false
    });
    state.accounts.insert(
        body.email,
        Account {
            password: body.password,
            user: user.clone(),
        },
    );
    Json(user).into_response()
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&state);
    state
        .account_for(bearer(&headers))
        .map_or_else(unauthorized, |account| Json(account.user.clone()).into_response())
}

fn require_admin(state: &BackendState, headers: &HeaderMap) -> Result<(), Response> {
    let account = state.account_for(bearer(headers)).ok_or_else(unauthorized)?;
    if account.user["is_superuser"] == json!(true) {
        Ok(())
    } else {
        Err(detail(StatusCode::FORBIDDEN, "The user doesn't have enough privileges"))
    }
}

async fn list_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&state);
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    let mut users: Vec<Value> = state.accounts.values().map(|a| a.user.clone()).collect();
    users.sort_by_key(|user| user["id"].as_i64());
    Json(users).into_response()
}

async fn update_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(update): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    let Some(account) = state
        .accounts
        .values_mut()
        .find(|account| account.user["id"].as_i64() == Some(id))
    else {
        return detail(StatusCode::NOT_FOUND, "User not found");
    };
    for field in ["is_superuser", "is_active"] {
        if let Some(value) = update.get(field).filter(|value| value.is_boolean()) {
            account.user[field] = value.clone();
        }
    }
    Json(account.user.clone()).into_response()
}

async fn list_categories(State(state): State<Shared>) -> Response {
    Json(lock(&state).categories.clone()).into_response()
}

#[derive(Deserialize)]
struct Paging {
    page: Option<usize>,
    page_size: Option<usize>,
}

async fn list_products(State(state): State<Shared>, Query(paging): Query<Paging>) -> Response {
    let state = lock(&state);
    if state.products_fail {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Search is unavailable");
    }
    let page = paging.page.unwrap_or(1).max(1);
    let size = paging.page_size.unwrap_or(12).max(1);
    let total = state.products.len();
    let items: Vec<Value> = state
        .products
        .iter()
        .skip((page - 1).saturating_mul(size))
        .take(size)
        .cloned()
        .collect();
    Json(json!({
        "items": items,
        "total": total,
        "page": page,
        "size": size,
        "pages": total.div_ceil(size),
    }))
    .into_response()
}

async fn get_product(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    lock(&state)
        .products
        .iter()
        .find(|product| product["id"].as_i64() == Some(id))
        .map_or_else(
            || detail(StatusCode::NOT_FOUND, "Product not found"),
            |product| Json(product.clone()).into_response(),
        )
}

async fn delete_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut state = lock(&state);
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    let Some(pos) = state
        .products
        .iter()
        .position(|product| product["id"].as_i64() == Some(id))
    else {
        return detail(StatusCode::NOT_FOUND, "Product not found");
    };
    Json(state.products.remove(pos)).into_response()
}

async fn get_wishlist(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&state);
    if state.account_for(bearer(&headers)).is_none() {
        return unauthorized();
    }
    Json(state.wishlist.clone()).into_response()
}

#[derive(Deserialize)]
struct WishlistAdd {
    product_id: i64,
}

async fn add_to_wishlist(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<WishlistAdd>,
) -> Response {
    let mut state = lock(&state);
    let Some(user_id) = state
        .account_for(bearer(&headers))
        .and_then(|account| account.user["id"].as_i64())
    else {
        return unauthorized();
    };
    if state
        .wishlist
        .iter()
        .any(|item| item["product_id"].as_i64() == Some(body.product_id))
    {
        return detail(StatusCode::BAD_REQUEST, "Product already in wishlist");
    }
    let Some(product) = state
        .products
        .iter()
        .find(|product| product["id"].as_i64() == Some(body.product_id))
        .cloned()
    else {
        return detail(StatusCode::NOT_FOUND, "Product not found");
    };
    let item = json!({
        "id": state.wishlist.len() + 1,
        "user_id": user_id,
        "product_id": body.product_id,
        "product": product,
    });
    state.wishlist.push(item.clone());
    Json(item).into_response()
}

async fn remove_from_wishlist(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(product_id): Path<i64>,
) -> Response {
    let mut state = lock(&state);
    if state.account_for(bearer(&headers)).is_none() {
        return unauthorized();
    }
    let Some(pos) = state
        .wishlist
        .iter()
        .position(|item| item["product_id"].as_i64() == Some(product_id))
    else {
        return detail(StatusCode::NOT_FOUND, "Item not found in wishlist");
    };
    Json(state.wishlist.remove(pos)).into_response()
}

async fn admin_stats(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&state);
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    Json(json!({
        "total_users": state.accounts.len(),
        "total_products": state.products.len(),
        "total_categories": 3,
    }))
    .into_response()
}

fn typed(setting: &Value) -> Value {
    let raw = setting["value"].as_str().unwrap_or_default();
    match setting["value_type"].as_str() {
        Some("boolean") => Value::Bool(raw == "true"),
        Some("integer") => raw.parse::<i64>().map_or(Value::Null, Value::from),
        _ => Value::String(raw.to_string()),
    }
}

fn upsert_setting(state: &mut BackendState, key: &str, value: String, value_type: Option<&str>) -> Value {
    if let Some(setting) = state.settings.iter_mut().find(|setting| setting["key"] == key) {
        setting["value"] = Value::String(value);
        if let Some(value_type) = value_type {
            setting["value_type"] = json!(value_type);
        }
        return setting.clone();
    }
    let setting = json!({
        "id": state.settings.len() + 1,
        "key": key,
        "value": value,
        "value_type": value_type.unwrap_or("string"),
        "category": "general",
    });
    state.settings.push(setting.clone());
    setting
}

async fn list_settings(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&state);
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    Json(state.settings.clone()).into_response()
}

async fn get_setting(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Response {
    let state = lock(&state);
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    state
        .settings
        .iter()
        .find(|setting| setting["key"] == key.as_str())
        .map_or_else(
            || detail(StatusCode::NOT_FOUND, "Setting not found"),
            |setting| Json(setting.clone()).into_response(),
        )
}

async fn update_setting(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(key): Path<String>,
    Json(update): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    let Some(value) = update["value"].as_str() else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "value is required");
    };
    let setting = upsert_setting(&mut state, &key, value.to_string(), update["value_type"].as_str());
    Json(setting).into_response()
}

async fn bulk_update_settings(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    if let Err(response) = require_admin(&state, &headers) {
        return response;
    }
    let Some(settings) = body["settings"].as_object() else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "settings is required");
    };
    let mut updated_keys = Vec::new();
    for (key, value) in settings {
        let (value, value_type) = match value {
            Value::Bool(flag) => (flag.to_string(), "boolean"),
            Value::Number(n) => (n.to_string(), "integer"),
            Value::String(text) => (text.clone(), "string"),
            _ => continue,
        };
        upsert_setting(&mut state, key, value, Some(value_type));
        updated_keys.push(key.clone());
    }
    Json(json!({
        "message": format!("Updated {} settings", updated_keys.len()),
        "updated_keys": updated_keys,
    }))
    .into_response()
}

async fn public_settings(State(state): State<Shared>) -> Response {
    let public: serde_json::Map<String, Value> = lock(&state)
        .settings
        .iter()
        .filter(|setting| setting["category"] == "general")
        .filter_map(|setting| Some((setting["key"].as_str()?.to_string(), typed(setting))))
        .collect();
    Json(Value::Object(public)).into_response()
}
