//! Store details readable without signing in.

use tracing::instrument;

use catalogue_client::ApiClient;
use catalogue_core::PublicSettings;

pub const DEFAULT_STORE_NAME: &str = "Catalogue";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// What the header and footer show about the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInfo {
    pub name: String,
    pub currency_symbol: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub maintenance_mode: bool,
}

impl Default for StoreInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_STORE_NAME.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            email: None,
            phone: None,
            maintenance_mode: false,
        }
    }
}

impl StoreInfo {
    /// Read the public settings, falling back to defaults for anything
    /// missing or blank.
    #[must_use]
    pub fn from_settings(settings: &PublicSettings) -> Self {
        let defaults = Self::default();
        Self {
            name: text(settings, "store_name").unwrap_or(defaults.name),
            currency_symbol: text(settings, "currency_symbol").unwrap_or(defaults.currency_symbol),
            email: text(settings, "store_email"),
            phone: text(settings, "store_phone"),
            maintenance_mode: settings.get("maintenance_mode").is_some_and(|value| {
                value.as_bool().unwrap_or_else(|| value.as_str() == Some("true"))
            }),
        }
    }

    /// Fetch the store details. A failed fetch is logged and reads as the
    /// defaults.
    #[instrument(skip(api))]
    pub async fn load(api: &ApiClient) -> Self {
        match api.public_settings().await {
            Ok(settings) => Self::from_settings(&settings),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load store settings");
                Self::default()
            }
        }
    }
}

fn text(settings: &PublicSettings, key: &str) -> Option<String> {
    settings
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
