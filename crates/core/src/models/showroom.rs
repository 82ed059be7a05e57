//! Physical showroom records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Email, ShowroomId};

/// Day keys used in `opening_hours`, in display order.
pub const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// A store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showroom {
    pub id: ShowroomId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub email: Email,
    /// Day name (lowercase) to a free-form hours string, e.g. `"10:00 AM - 8:00 PM"`.
    #[serde(default)]
    pub opening_hours: BTreeMap<String, String>,
    #[serde(default)]
    pub map_url: Option<String>,
    #[serde(default)]
    pub gallery_images: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

const fn default_true() -> bool {
    true
}

impl Showroom {
    /// Opening hours in weekday order; days without an entry read "Closed".
    #[must_use]
    pub fn weekly_hours(&self) -> Vec<(&'static str, &str)> {
        WEEKDAYS
            .iter()
            .map(|day| {
                let hours = self
                    .opening_hours
                    .get(*day)
                    .map_or("Closed", String::as_str);
                (*day, hours)
            })
            .collect()
    }

    /// One-line postal address.
    #[must_use]
    pub fn full_address(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.address, self.city, self.state, self.zip_code
        )
    }
}

/// Showroom fields sent on create and update.
///
/// `gallery_images` lists already-uploaded images to keep; new image files
/// travel separately in the multipart body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowroomDraft {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub email: Email,
    pub opening_hours: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
    #[serde(default)]
    pub gallery_images: Vec<String>,
    pub is_active: bool,
}

impl From<&Showroom> for ShowroomDraft {
    fn from(showroom: &Showroom) -> Self {
        Self {
            name: showroom.name.clone(),
            address: showroom.address.clone(),
            city: showroom.city.clone(),
            state: showroom.state.clone(),
            zip_code: showroom.zip_code.clone(),
            phone: showroom.phone.clone(),
            email: showroom.email.clone(),
            opening_hours: showroom.opening_hours.clone(),
            map_url: showroom.map_url.clone(),
            gallery_images: showroom.gallery_images.clone().unwrap_or_default(),
            is_active: showroom.is_active,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_hours_in_order_with_closed_days() {
        let showroom: Showroom = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Flagship", "address": "1 Main St", "city": "Pune",
            "state": "MH", "zip_code": "411001", "phone": "+91 20 5555 0000",
            "email": "flagship@example.com",
            "opening_hours": {"sunday": "Closed", "monday": "10:00 AM - 8:00 PM"}
        }))
        .unwrap();

        let hours = showroom.weekly_hours();
        assert_eq!(hours[0], ("monday", "10:00 AM - 8:00 PM"));
        assert_eq!(hours[1], ("tuesday", "Closed"));
        assert_eq!(hours.len(), 7);
        assert_eq!(showroom.full_address(), "1 Main St, Pune, MH 411001");
    }
}
