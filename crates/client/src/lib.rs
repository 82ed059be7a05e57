//! Session store and authenticated API client for the catalogue backend.
//!
//! [`SessionStore`] holds who is signed in; [`ApiClient`] attaches that
//! session's bearer token to every request, refreshes it before it expires and
//! retries once on `401`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod token;

pub use api::{ApiClient, Auth, MultipartBody, ProductQuery, Upload};
pub use config::{ApiTarget, ClientConfig, ConfigError};
pub use error::{ApiError, ErrorKind};
pub use reqwest::StatusCode;
pub use session::{
    FileStorage, MemoryStorage, REMEMBERED_EMAIL_KEY, SESSION_STORAGE_KEY, Session,
    SessionStorage, SessionStore, StorageError,
};
pub use token::{AccessToken, TokenResponse};
