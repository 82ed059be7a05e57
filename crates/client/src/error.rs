//! API error taxonomy.
//!
//! Every backend call returns [`ApiError`]. Callers rarely match on variants;
//! they ask for the [`ErrorKind`] or for a [`user_message`](ApiError::user_message)
//! to put in a banner.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the catalogue backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, TLS, body read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected our credentials and the one silent refresh did not help.
    #[error("Unauthorized{}", format_detail(.detail.as_deref()))]
    Unauthorized {
        /// Backend-provided reason, if any.
        detail: Option<String>,
    },

    /// The backend answered with a non-success status.
    #[error("HTTP {status}{}", format_detail(.detail.as_deref()))]
    Api {
        /// Response status.
        status: StatusCode,
        /// Backend-provided `detail` message, if any.
        detail: Option<String>,
    },

    /// A success response body did not match the expected schema.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A local file for upload could not be read.
    #[error("Upload error: {0}")]
    Upload(#[from] std::io::Error),
}

/// Coarse error classes that decide how a caller reacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials missing, expired or rejected.
    Authentication,
    /// The backend refused the request with a message meant for the user.
    Validation,
    /// Anything else: transport failures, server errors, malformed bodies.
    Network,
}

fn format_detail(detail: Option<&str>) -> String {
    detail.map(|d| format!(": {d}")).unwrap_or_default()
}

impl ApiError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Authentication,
            Self::Api { status, .. } if status.is_client_error() => ErrorKind::Validation,
            _ => ErrorKind::Network,
        }
    }

    /// HTTP status of the failed response, when there was one.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's `detail` message, if it sent one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message to show the user: the backend `detail` verbatim when present,
    /// otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    /// Whether the backend reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Build the error for a non-success response from its status and body.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let detail = extract_detail(body);
        if status == StatusCode::UNAUTHORIZED {
            Self::Unauthorized { detail }
        } else {
            Self::Api { status, detail }
        }
    }
}

/// Error body shape used by the backend.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Pull a human-readable message out of an error body.
///
/// `detail` is usually a string. Request validation failures instead carry a
/// list of `{ "msg": ... }` objects, which are joined with `"; "`.
fn extract_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(message) => Some(message),
        serde_json::Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .map(str::to_string)
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail_is_used_verbatim() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, br#"{"detail":"Invalid credentials"}"#);
        assert_eq!(err.detail(), Some("Invalid credentials"));
        assert_eq!(err.user_message("fallback"), "Invalid credentials");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "HTTP 400 Bad Request: Invalid credentials");
    }

    #[test]
    fn test_validation_list_detail_is_joined() {
        let body = br#"{"detail":[{"loc":["body","email"],"msg":"field required"},{"msg":"too short"}]}"#;
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(err.detail(), Some("field required; too short"));
    }

    #[test]
    fn test_missing_detail_falls_back() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");
        assert_eq!(err.detail(), None);
        assert_eq!(err.user_message("Failed to delete product"), "Failed to delete product");
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[test]
    fn test_unauthorized_classification() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, br#"{"detail":"Not authenticated"}"#);
        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.to_string(), "Unauthorized: Not authenticated");
    }

    #[test]
    fn test_not_found() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, br#"{"detail":"Product not found"}"#);
        assert!(err.is_not_found());
    }
}
