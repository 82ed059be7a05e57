//! Authenticated client for the catalogue backend REST API.
//!
//! # Authentication
//!
//! Every request made through [`ApiClient`] passes through one interceptor:
//!
//! 1. Before sending, the current token's `exp` claim is read (signature not
//!    verified). A token within the refresh window (or already expired) is
//!    exchanged at `/login/refresh-token` first. If that fails the session is
//!    cleared and the request goes out unauthenticated.
//! 2. A `401` on the first attempt triggers one refresh and exactly one
//!    resubmission with the new token. If the refresh fails the session is
//!    cleared and the `401` is returned.
//! 3. A `401` on the resubmission is returned as-is; there is no second refresh.
//!
//! Refreshes are single-flight: concurrent callers queue on a gate, and a
//! caller that finds the token already replaced by the time it gets through
//! uses the new token instead of refreshing again.
//!
//! Requests are described by closures so a resubmission is a freshly built
//! request, multipart bodies included.
//!
//! Login and registration go out with [`Auth::Anonymous`]: no token attached,
//! and a `401` is just an answer, not a reason to refresh or sign out.

mod admin;
mod auth;
mod categories;
mod multipart;
mod products;
mod settings;
mod showrooms;
mod users;
mod wishlist;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

pub use multipart::{MultipartBody, Upload};
pub use products::ProductQuery;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionStore;
use crate::token::{AccessToken, TokenResponse};

/// How a request authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Attach the session's bearer token and self-heal once on `401`.
    Bearer,
    /// Send without credentials and without the refresh policy.
    Anonymous,
}

/// Catalogue backend API client.
///
/// Cheap to clone; clones share the HTTP connection pool, the session and the
/// refresh gate.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    api_url: Url,
    backend_base_url: String,
    session: SessionStore,
    refresh_window: Duration,
    /// Serializes refresh attempts.
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    /// Create a client for the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                api_url: config.api_url.clone(),
                backend_base_url: config.backend_base_url(),
                session,
                refresh_window: config.refresh_window,
                refresh_gate: Mutex::new(()),
            }),
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Backend origin (API URL without `/api/v1`).
    #[must_use]
    pub fn backend_base_url(&self) -> &str {
        &self.inner.backend_base_url
    }

    /// Resolve a media URL returned by the backend to an absolute URL.
    #[must_use]
    pub fn media_url(&self, url: &str) -> String {
        catalogue_core::resolve_media_url(&self.inner.backend_base_url, url)
    }

    // =========================================================================
    // URL building
    // =========================================================================

    /// Absolute URL for an API path such as `/products/3`.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.inner.api_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }

    /// Absolute URL with query parameters appended in order.
    fn endpoint_with_query(&self, path: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.endpoint(path);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    // =========================================================================
    // Interceptor
    // =========================================================================

    /// Send a request built by `build` under the authentication policy.
    ///
    /// Non-success responses become `ApiError`s carrying the backend `detail`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when the request is still rejected
    /// after the single refresh-and-retry, `ApiError::Api` for other
    /// non-success statuses and `ApiError::Http` for transport failures.
    pub async fn execute<F>(&self, auth: Auth, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder + Send + Sync,
    {
        if auth == Auth::Anonymous {
            let response = build(&self.inner.http).send().await?;
            return check_status(response).await;
        }

        let token = self.token_for_request().await;
        let response = self.dispatch(&build, token.as_ref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return check_status(response).await;
        }

        tracing::debug!("Request rejected with 401, attempting one refresh");
        let Some(fresh) = self.refresh(token.as_ref()).await else {
            return check_status(response).await;
        };

        let retried = self.dispatch(&build, Some(&fresh)).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("Retried request rejected with 401, not refreshing again");
        }
        check_status(retried).await
    }

    async fn dispatch<F>(&self, build: &F, token: Option<&AccessToken>) -> Result<Response, ApiError>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder + Send + Sync,
    {
        let mut request = build(&self.inner.http);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token.bearer());
        }
        Ok(request.send().await?)
    }

    /// The token to attach to an outgoing request, refreshed first if it is
    /// about to expire.
    async fn token_for_request(&self) -> Option<AccessToken> {
        let token = self.inner.session.token()?;
        if !token.expires_within(self.inner.refresh_window, chrono::Utc::now()) {
            return Some(token);
        }
        tracing::debug!("Access token expiring soon, refreshing before send");
        self.refresh(Some(&token)).await
    }

    /// Exchange `stale` for a new token, at most once per stale token.
    ///
    /// On success the session's token is replaced. On failure the session is
    /// cleared and `None` is returned.
    async fn refresh(&self, stale: Option<&AccessToken>) -> Option<AccessToken> {
        let _gate = self.inner.refresh_gate.lock().await;

        let credential = match (self.inner.session.token(), stale) {
            (Some(current), Some(stale)) if current == *stale => current,
            // Another caller refreshed (or signed in) while we waited.
            (Some(current), _) => return Some(current),
            (None, _) => {
                self.inner.session.logout();
                return None;
            }
        };

        match self.request_refresh(&credential).await {
            Ok(token) => {
                tracing::info!("Access token refreshed");
                self.inner.session.set_token(token.clone());
                Some(token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, clearing session");
                self.inner.session.logout();
                None
            }
        }
    }

    /// Call the refresh endpoint directly, outside the interceptor.
    #[instrument(skip(self, credential))]
    async fn request_refresh(&self, credential: &AccessToken) -> Result<AccessToken, ApiError> {
        let response = self
            .inner
            .http
            .post(self.endpoint("/login/refresh-token"))
            .header(AUTHORIZATION, credential.bearer())
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: TokenResponse = decode(response).await?;
        Ok(body.access_token)
    }

    // =========================================================================
    // Typed helpers used by the endpoint modules
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint_with_query(path, query);
        let response = self
            .execute(Auth::Bearer, |http| http.get(url.clone()))
            .await?;
        decode(response).await
    }

    async fn send_json<B, T>(
        &self,
        auth: Auth,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let response = self
            .execute(auth, |http| http.request(method.clone(), url.clone()).json(body))
            .await?;
        decode(response).await
    }

    async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let response = self
            .execute(Auth::Bearer, |http| http.delete(url.clone()))
            .await?;
        decode(response).await
    }

    async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &MultipartBody,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let response = self
            .execute(Auth::Bearer, |http| {
                http.request(method.clone(), url.clone())
                    .multipart(body.to_form())
            })
            .await?;
        decode(response).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_url", &self.inner.api_url.as_str())
            .field("refresh_window", &self.inner.refresh_window)
            .finish_non_exhaustive()
    }
}

/// Turn a non-success response into an `ApiError`.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    Err(ApiError::from_status(status, &body))
}

/// Deserialize a success body.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
