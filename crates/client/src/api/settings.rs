//! Site settings.

use std::collections::BTreeMap;

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use catalogue_core::{BulkUpdateResult, PublicSettings, SettingUpdate, SiteSetting};

use super::{ApiClient, Auth};
use crate::error::ApiError;

#[derive(Serialize)]
struct BulkUpdate<'a> {
    settings: &'a BTreeMap<String, serde_json::Value>,
}

impl ApiClient {
    /// All settings. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_settings(&self) -> Result<Vec<SiteSetting>, ApiError> {
        self.get_json("/settings", &[]).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Api` (404) for an unknown key.
    #[instrument(skip(self))]
    pub async fn get_setting(&self, key: &str) -> Result<SiteSetting, ApiError> {
        self.get_json(&format!("/settings/{key}"), &[]).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's reason on rejection.
    #[instrument(skip(self))]
    pub async fn update_setting(
        &self,
        key: &str,
        update: &SettingUpdate,
    ) -> Result<SiteSetting, ApiError> {
        self.send_json(Auth::Bearer, Method::PUT, &format!("/settings/{key}"), update)
            .await
    }

    /// Write many settings at once, keyed by setting key.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's reason on rejection.
    #[instrument(skip(self, settings), fields(count = settings.len()))]
    pub async fn bulk_update_settings(
        &self,
        settings: &BTreeMap<String, serde_json::Value>,
    ) -> Result<BulkUpdateResult, ApiError> {
        self.send_json(
            Auth::Bearer,
            Method::POST,
            "/settings/bulk-update",
            &BulkUpdate { settings },
        )
        .await
    }

    /// Settings readable without signing in.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn public_settings(&self) -> Result<PublicSettings, ApiError> {
        self.get_json("/settings/public/general", &[]).await
    }
}
