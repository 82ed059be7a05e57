//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CATALOGUE_API_URL` - Backend API base URL including the `/api/v1` prefix
//! - `CATALOGUE_API_TARGET` - `client` (default) or `server`; picks the default
//!   API URL when `CATALOGUE_API_URL` is unset
//! - `CATALOGUE_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `CATALOGUE_TOKEN_REFRESH_WINDOW_SECS` - Refresh tokens expiring within
//!   this many seconds before sending (default: 300)
//! - `CATALOGUE_DATA_DIR` - Directory holding the persisted session (default: `.catalogue`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default API URL when running next to the user (browser, terminal).
pub const DEFAULT_CLIENT_API_URL: &str = "http://localhost:8000/api/v1";

/// Default API URL when running inside the backend's network.
pub const DEFAULT_SERVER_API_URL: &str = "http://backend:8000/api/v1";

/// Path prefix of the versioned API; stripped to get the backend origin.
const API_PREFIX: &str = "/api/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REFRESH_WINDOW_SECS: u64 = 300;
const DEFAULT_DATA_DIR: &str = ".catalogue";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the client runs relative to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiTarget {
    /// On the user's machine; the backend is reached on localhost.
    #[default]
    Client,
    /// On the server side; the backend is reached by its service host name.
    Server,
}

impl ApiTarget {
    /// Default API URL for this target.
    #[must_use]
    pub const fn default_api_url(self) -> &'static str {
        match self {
            Self::Client => DEFAULT_CLIENT_API_URL,
            Self::Server => DEFAULT_SERVER_API_URL,
        }
    }
}

impl std::str::FromStr for ApiTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "server" => Ok(Self::Server),
            other => Err(format!("expected `client` or `server`, got `{other}`")),
        }
    }
}

/// Catalogue client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API base URL, e.g. `http://localhost:8000/api/v1`
    pub api_url: Url,
    /// Request timeout applied to every backend call
    pub request_timeout: Duration,
    /// Tokens expiring within this window are refreshed before use
    pub refresh_window: Duration,
    /// Directory for durable client state (the persisted session)
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Configuration pointing at `api_url` with every other value defaulted.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            refresh_window: Duration::from_secs(DEFAULT_REFRESH_WINDOW_SECS),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let target = get_optional_env("CATALOGUE_API_TARGET")
            .map(|raw| {
                raw.parse::<ApiTarget>()
                    .map_err(|e| ConfigError::InvalidEnvVar("CATALOGUE_API_TARGET".to_string(), e))
            })
            .transpose()?
            .unwrap_or_default();

        let raw_url = get_env_or_default("CATALOGUE_API_URL", target.default_api_url());
        let api_url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("CATALOGUE_API_URL".to_string(), e.to_string())
        })?;

        let request_timeout = Duration::from_secs(get_secs(
            "CATALOGUE_REQUEST_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?);
        let refresh_window = Duration::from_secs(get_secs(
            "CATALOGUE_TOKEN_REFRESH_WINDOW_SECS",
            DEFAULT_REFRESH_WINDOW_SECS,
        )?);
        let data_dir = PathBuf::from(get_env_or_default("CATALOGUE_DATA_DIR", DEFAULT_DATA_DIR));

        Ok(Self {
            api_url,
            request_timeout,
            refresh_window,
            data_dir,
        })
    }

    /// The backend origin without the API prefix, used for uploaded media.
    ///
    /// `http://localhost:8000/api/v1` becomes `http://localhost:8000`.
    #[must_use]
    pub fn backend_base_url(&self) -> String {
        let api = self.api_url.as_str().trim_end_matches('/');
        api.strip_suffix(API_PREFIX).unwrap_or(api).to_string()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a whole number of seconds from the environment.
fn get_secs(key: &str, default: u64) -> Result<u64, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_base_url_strips_api_prefix() {
        let config = ClientConfig::new(Url::parse("http://localhost:8000/api/v1").unwrap());
        assert_eq!(config.backend_base_url(), "http://localhost:8000");

        let config = ClientConfig::new(Url::parse("https://shop.example.com/api/v1/").unwrap());
        assert_eq!(config.backend_base_url(), "https://shop.example.com");
    }

    #[test]
    fn test_backend_base_url_without_prefix_is_unchanged() {
        let config = ClientConfig::new(Url::parse("http://127.0.0.1:9000").unwrap());
        assert_eq!(config.backend_base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_api_target_defaults() {
        assert_eq!(ApiTarget::Client.default_api_url(), DEFAULT_CLIENT_API_URL);
        assert_eq!(ApiTarget::Server.default_api_url(), DEFAULT_SERVER_API_URL);
        assert_eq!("SERVER".parse::<ApiTarget>().unwrap(), ApiTarget::Server);
        assert!("browser".parse::<ApiTarget>().is_err());
    }

    #[test]
    fn test_new_config_defaults() {
        let config = ClientConfig::new(Url::parse(DEFAULT_CLIENT_API_URL).unwrap());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.refresh_window, Duration::from_secs(300));
        assert_eq!(config.data_dir, PathBuf::from(".catalogue"));
    }
}
