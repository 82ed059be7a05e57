//! Site settings.
//!
//! Settings are stored by the backend as strings tagged with a `value_type`.
//! [`SiteSetting::typed_value`] reads them back the way the settings form
//! needs them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::SettingId;

/// How a setting's string value should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingValueType {
    #[default]
    String,
    Boolean,
    Integer,
    /// Any tag this client does not know; treated as text.
    #[serde(other)]
    Other,
}

/// A typed setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Number(i64),
    Text(String),
}

impl SettingValue {
    /// Parse user input according to a value type.
    ///
    /// Booleans accept `true/false`, `yes/no`, `on/off` and `1/0`; integers
    /// must parse as `i64`. Returns `None` when the input does not fit.
    #[must_use]
    pub fn parse_as(value_type: SettingValueType, input: &str) -> Option<Self> {
        let input = input.trim();
        match value_type {
            SettingValueType::Boolean => match input.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(Self::Flag(true)),
                "false" | "no" | "off" | "0" => Some(Self::Flag(false)),
                _ => None,
            },
            SettingValueType::Integer => input.parse().ok().map(Self::Number),
            SettingValueType::String | SettingValueType::Other => {
                Some(Self::Text(input.to_owned()))
            }
        }
    }

    /// The JSON value sent in a bulk update.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Flag(flag) => serde_json::Value::Bool(*flag),
            Self::Number(n) => serde_json::Value::from(*n),
            Self::Text(text) => serde_json::Value::String(text.clone()),
        }
    }
}

impl core::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// A stored site setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSetting {
    pub id: SettingId,
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub value_type: SettingValueType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn default_category() -> String {
    "general".to_owned()
}

impl SiteSetting {
    /// The stored value interpreted by `value_type`.
    ///
    /// Booleans are true only for the exact string `"true"`; integers that are
    /// missing or unparseable read as `0`; text that is missing reads as `""`.
    #[must_use]
    pub fn typed_value(&self) -> SettingValue {
        let raw = self.value.as_deref();
        match self.value_type {
            SettingValueType::Boolean => SettingValue::Flag(raw == Some("true")),
            SettingValueType::Integer => {
                SettingValue::Number(raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0))
            }
            SettingValueType::String | SettingValueType::Other => {
                SettingValue::Text(raw.unwrap_or_default().to_owned())
            }
        }
    }
}

/// Partial update of a single setting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<SettingValueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Response of a bulk settings update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUpdateResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub updated_keys: Vec<String>,
}

/// Publicly readable settings keyed by name.
pub type PublicSettings = BTreeMap<String, serde_json::Value>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn setting(value_type: &str, value: Option<&str>) -> SiteSetting {
        serde_json::from_value(serde_json::json!({
            "id": 1, "key": "k", "value": value, "value_type": value_type
        }))
        .unwrap()
    }

    #[test]
    fn test_typed_value_by_type() {
        assert_eq!(setting("boolean", Some("true")).typed_value(), SettingValue::Flag(true));
        assert_eq!(setting("boolean", Some("yes")).typed_value(), SettingValue::Flag(false));
        assert_eq!(setting("integer", Some("24")).typed_value(), SettingValue::Number(24));
        assert_eq!(setting("integer", None).typed_value(), SettingValue::Number(0));
        assert_eq!(setting("string", None).typed_value(), SettingValue::Text(String::new()));
    }

    #[test]
    fn test_unknown_value_type_reads_as_text() {
        let s = setting("json", Some("{}"));
        assert_eq!(s.value_type, SettingValueType::Other);
        assert_eq!(s.typed_value(), SettingValue::Text("{}".to_owned()));
    }

    #[test]
    fn test_parse_as() {
        assert_eq!(
            SettingValue::parse_as(SettingValueType::Boolean, "On"),
            Some(SettingValue::Flag(true))
        );
        assert_eq!(SettingValue::parse_as(SettingValueType::Integer, "ten"), None);
        assert_eq!(
            SettingValue::parse_as(SettingValueType::Integer, " 10 ").map(|v| v.to_json()),
            Some(serde_json::json!(10))
        );
    }
}
