//! Unified error handling for admin screens.

use catalogue_client::ApiError;
use thiserror::Error;

/// Why an admin action did not go through.
#[derive(Debug, Error)]
pub enum CrudError {
    /// Another change to the same row is still in flight.
    #[error("Another change to {0} is still in progress")]
    Busy(String),

    /// The operator declined the confirmation prompt.
    #[error("Cancelled")]
    Cancelled,

    /// The backend rejected the change. `alert` is what the operator was shown.
    #[error("{alert}")]
    Rejected {
        alert: String,
        #[source]
        source: ApiError,
    },

    /// The row is not on the current screen.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl CrudError {
    /// Wrap a backend failure, preferring its `detail` over `fallback`.
    #[must_use]
    pub fn rejected(source: ApiError, fallback: &str) -> Self {
        Self::Rejected {
            alert: source.user_message(fallback),
            source,
        }
    }

    /// Text for a blocking alert, if this error warrants one.
    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        match self {
            Self::Rejected { alert, .. } => Some(alert),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use catalogue_client::StatusCode;

    use super::*;

    #[test]
    fn test_rejected_prefers_backend_detail() {
        let err = CrudError::rejected(
            ApiError::from_status(StatusCode::CONFLICT, br#"{"detail":"Product has orders"}"#),
            "Failed to delete product",
        );
        assert_eq!(err.alert(), Some("Product has orders"));
        assert_eq!(err.to_string(), "Product has orders");
    }

    #[test]
    fn test_rejected_falls_back() {
        let err = CrudError::rejected(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, b""),
            "Failed to delete product",
        );
        assert_eq!(err.alert(), Some("Failed to delete product"));
        assert!(CrudError::Cancelled.alert().is_none());
    }
}
