//! Token issuance and open registration.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;

use catalogue_core::{Email, User};

use super::{ApiClient, Auth};
use crate::error::ApiError;
use crate::token::{AccessToken, TokenResponse};

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    email: &'a str,
    password: &'a str,
    full_name: &'a str,
    user_type: &'static str,
}

impl ApiClient {
    /// Exchange email and password for an access token.
    ///
    /// Sent anonymously: a rejected login is returned to the caller and never
    /// touches the current session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` (usually 400 with a `detail`) for bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login_access_token(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AccessToken, ApiError> {
        let body = Credentials {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let response: TokenResponse = self
            .send_json(Auth::Anonymous, Method::POST, "/login/access-token", &body)
            .await?;
        tracing::debug!("Access token issued");
        Ok(response.access_token)
    }

    /// Exchange the session's current token for a new one and store it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if there is no token or the backend
    /// refuses it.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> Result<AccessToken, ApiError> {
        let current = self
            .session()
            .token()
            .ok_or(ApiError::Unauthorized { detail: None })?;
        let token = self.request_refresh(&current).await?;
        self.session().set_token(token.clone());
        Ok(token)
    }

    /// Create a regular customer account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's reason, e.g. an email that is
    /// already registered.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        email: &Email,
        password: &SecretString,
        full_name: &str,
    ) -> Result<User, ApiError> {
        let body = Registration {
            email: email.as_str(),
            password: password.expose_secret(),
            full_name,
            user_type: "user",
        };
        self.send_json(Auth::Anonymous, Method::POST, "/users/open", &body)
            .await
    }
}
