//! Store settings form.
//!
//! The form starts from built-in defaults, is overlaid with whatever the
//! backend has stored (read through each setting's `value_type`) and is saved
//! in one bulk request. A single field can also be re-read or saved alone.

use std::collections::BTreeMap;

use tracing::instrument;

use catalogue_client::ApiClient;
use catalogue_core::{SettingUpdate, SettingValue, SettingValueType};

use crate::error::CrudError;

pub const SAVED_ALERT: &str = "Settings saved successfully!";
pub const SAVE_FAILED_ALERT: &str = "Failed to save settings. Please try again.";
pub const LOAD_FAILED_ALERT: &str = "Failed to load setting";

/// Form fields with their defaults, grouped as the form shows them.
const DEFAULTS: &[(&str, FieldDefault)] = &[
    // Store information
    ("store_name", FieldDefault::Text("")),
    ("store_logo", FieldDefault::Text("")),
    ("store_email", FieldDefault::Text("")),
    ("store_phone", FieldDefault::Text("")),
    ("store_address", FieldDefault::Text("")),
    // General
    ("currency", FieldDefault::Text("INR")),
    ("currency_symbol", FieldDefault::Text("₹")),
    ("timezone", FieldDefault::Text("Asia/Kolkata")),
    ("maintenance_mode", FieldDefault::Flag(false)),
    ("user_registration_enabled", FieldDefault::Flag(true)),
    // SEO
    ("meta_title", FieldDefault::Text("")),
    ("meta_description", FieldDefault::Text("")),
    ("meta_keywords", FieldDefault::Text("")),
    ("social_facebook", FieldDefault::Text("")),
    ("social_instagram", FieldDefault::Text("")),
    ("social_twitter", FieldDefault::Text("")),
    // Products
    ("low_stock_threshold", FieldDefault::Number(10)),
    ("products_per_page", FieldDefault::Number(24)),
    ("max_image_size_mb", FieldDefault::Number(5)),
    ("allowed_image_formats", FieldDefault::Text("jpg,jpeg,png,webp")),
    // Security
    ("session_timeout_minutes", FieldDefault::Number(30)),
];

#[derive(Clone, Copy)]
enum FieldDefault {
    Text(&'static str),
    Flag(bool),
    Number(i64),
}

impl FieldDefault {
    fn value(self) -> SettingValue {
        match self {
            Self::Text(text) => SettingValue::Text(text.to_string()),
            Self::Flag(flag) => SettingValue::Flag(flag),
            Self::Number(n) => SettingValue::Number(n),
        }
    }
}

fn value_type_of(value: &SettingValue) -> SettingValueType {
    match value {
        SettingValue::Flag(_) => SettingValueType::Boolean,
        SettingValue::Number(_) => SettingValueType::Integer,
        SettingValue::Text(_) => SettingValueType::String,
    }
}

/// Why a field edit was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Unknown setting: {0}")]
    Unknown(String),
    #[error("{key} expects {expected}, got \"{input}\"")]
    Invalid {
        key: String,
        expected: &'static str,
        input: String,
    },
}

#[derive(Debug)]
pub struct SettingsScreen {
    api: ApiClient,
    values: BTreeMap<String, SettingValue>,
    alert: Option<String>,
}

impl SettingsScreen {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let values = DEFAULTS
            .iter()
            .map(|(key, default)| ((*key).to_string(), default.value()))
            .collect();
        Self {
            api,
            values,
            alert: None,
        }
    }

    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, SettingValue> {
        &self.values
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Overlay stored settings on the form. A failure is logged and the form
    /// keeps its current values.
    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        match self.api.list_settings().await {
            Ok(settings) => {
                for setting in settings {
                    let value = setting.typed_value();
                    self.values.insert(setting.key, value);
                }
            }
            Err(e) => tracing::error!(error = %e, "Failed to load settings"),
        }
    }

    /// Set `key` from operator input, parsed by the field's current type.
    ///
    /// # Errors
    ///
    /// Returns `FieldError` for an unknown key or input that does not fit.
    pub fn set(&mut self, key: &str, input: &str) -> Result<(), FieldError> {
        let current = self
            .values
            .get(key)
            .ok_or_else(|| FieldError::Unknown(key.to_string()))?;
        let value_type = value_type_of(current);
        let parsed = SettingValue::parse_as(value_type, input).ok_or_else(|| FieldError::Invalid {
            key: key.to_string(),
            expected: match value_type {
                SettingValueType::Boolean => "true or false",
                SettingValueType::Integer => "a whole number",
                SettingValueType::String | SettingValueType::Other => "text",
            },
            input: input.to_string(),
        })?;
        self.values.insert(key.to_string(), parsed);
        Ok(())
    }

    /// Save every field in one request.
    ///
    /// # Errors
    ///
    /// Returns `CrudError::Rejected` carrying the generic failure alert.
    #[instrument(skip(self))]
    pub async fn save(&mut self) -> Result<(), CrudError> {
        let payload: BTreeMap<String, serde_json::Value> = self
            .values
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();

        match self.api.bulk_update_settings(&payload).await {
            Ok(result) => {
                tracing::info!(updated = result.updated_keys.len(), "Settings saved");
                self.alert = Some(SAVED_ALERT.to_string());
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save settings");
                self.alert = Some(SAVE_FAILED_ALERT.to_string());
                Err(CrudError::Rejected {
                    alert: SAVE_FAILED_ALERT.to_string(),
                    source: e,
                })
            }
        }
    }

    /// Re-read `key` from the backend. A setting the backend has never stored
    /// keeps its form value.
    ///
    /// # Errors
    ///
    /// Returns `CrudError::NotFound` for a key the form does not have and
    /// `CrudError::Rejected` if the backend fails.
    #[instrument(skip(self))]
    pub async fn reload_field(&mut self, key: &str) -> Result<(), CrudError> {
        if !self.values.contains_key(key) {
            return Err(CrudError::NotFound(key.to_string()));
        }
        match self.api.get_setting(key).await {
            Ok(setting) => {
                let value = setting.typed_value();
                self.values.insert(setting.key, value);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(key, "Setting not stored; keeping default");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, key, "Failed to load setting");
                Err(CrudError::rejected(e, LOAD_FAILED_ALERT))
            }
        }
    }

    /// Save `key` alone, tagged with its type.
    ///
    /// # Errors
    ///
    /// Returns `CrudError::NotFound` for a key the form does not have and
    /// `CrudError::Rejected` with the backend's reason when present.
    #[instrument(skip(self))]
    pub async fn save_field(&mut self, key: &str) -> Result<(), CrudError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| CrudError::NotFound(key.to_string()))?;
        let update = SettingUpdate {
            value: Some(value.to_string()),
            value_type: Some(value_type_of(value)),
            ..SettingUpdate::default()
        };

        match self.api.update_setting(key, &update).await {
            Ok(saved) => {
                let value = saved.typed_value();
                self.values.insert(saved.key, value);
                self.alert = Some(SAVED_ALERT.to_string());
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, key, "Failed to save setting");
                let err = CrudError::rejected(e, SAVE_FAILED_ALERT);
                self.alert = err.alert().map(str::to_string);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalogue_client::{ClientConfig, SessionStore};
    use url::Url;

    use super::*;

    fn screen() -> SettingsScreen {
        let config = ClientConfig::new(Url::parse("http://127.0.0.1:9/api/v1").unwrap());
        SettingsScreen::new(ApiClient::new(&config, SessionStore::in_memory()).unwrap())
    }

    #[test]
    fn test_form_defaults() {
        let screen = screen();
        assert_eq!(screen.get("currency"), Some(&SettingValue::Text("INR".to_string())));
        assert_eq!(screen.get("products_per_page"), Some(&SettingValue::Number(24)));
        assert_eq!(screen.get("user_registration_enabled"), Some(&SettingValue::Flag(true)));
        assert_eq!(screen.values().len(), DEFAULTS.len());
    }

    #[test]
    fn test_set_parses_by_field_type() {
        let mut screen = screen();
        screen.set("maintenance_mode", "yes").unwrap();
        assert_eq!(screen.get("maintenance_mode"), Some(&SettingValue::Flag(true)));

        screen.set("low_stock_threshold", "5").unwrap();
        assert_eq!(screen.get("low_stock_threshold"), Some(&SettingValue::Number(5)));

        assert!(matches!(
            screen.set("low_stock_threshold", "many"),
            Err(FieldError::Invalid { expected: "a whole number", .. })
        ));
        assert!(matches!(screen.set("nope", "1"), Err(FieldError::Unknown(_))));
    }

    #[tokio::test]
    async fn test_single_field_ops_reject_unknown_keys() {
        let mut screen = screen();
        assert!(matches!(screen.reload_field("nope").await, Err(CrudError::NotFound(_))));
        assert!(matches!(screen.save_field("nope").await, Err(CrudError::NotFound(_))));
        assert!(screen.alert().is_none());
    }
}
