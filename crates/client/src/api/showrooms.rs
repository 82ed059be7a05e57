//! Showroom listing and admin showroom management.

use reqwest::Method;
use tracing::instrument;

use catalogue_core::{Showroom, ShowroomDraft, ShowroomId};

use super::{ApiClient, MultipartBody, Upload};
use crate::error::ApiError;

impl ApiClient {
    /// List showrooms, optionally only the active ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_showrooms(&self, active_only: bool) -> Result<Vec<Showroom>, ApiError> {
        self.get_json("/showrooms", &[("active_only", active_only.to_string())])
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Api` (404) for an unknown showroom.
    #[instrument(skip(self))]
    pub async fn get_showroom(&self, id: ShowroomId) -> Result<Showroom, ApiError> {
        self.get_json(&format!("/showrooms/{id}"), &[]).await
    }

    /// Create a showroom with new gallery uploads. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's reason on rejection.
    #[instrument(skip(self, draft, images), fields(name = %draft.name))]
    pub async fn create_showroom(
        &self,
        draft: &ShowroomDraft,
        images: &[Upload],
    ) -> Result<Showroom, ApiError> {
        let body = showroom_body(draft, images)?;
        self.send_multipart(Method::POST, "/showrooms", &body).await
    }

    /// Update a showroom. `draft.gallery_images` lists the existing images to
    /// keep; `images` are appended. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's reason on rejection.
    #[instrument(skip(self, draft, images))]
    pub async fn update_showroom(
        &self,
        id: ShowroomId,
        draft: &ShowroomDraft,
        images: &[Upload],
    ) -> Result<Showroom, ApiError> {
        let body = showroom_body(draft, images)?;
        self.send_multipart(Method::PUT, &format!("/showrooms/{id}"), &body)
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's reason on rejection.
    #[instrument(skip(self))]
    pub async fn delete_showroom(&self, id: ShowroomId) -> Result<Showroom, ApiError> {
        self.delete_json(&format!("/showrooms/{id}")).await
    }
}

fn showroom_body(draft: &ShowroomDraft, images: &[Upload]) -> Result<MultipartBody, ApiError> {
    let mut body = MultipartBody::new()
        .text("name", &draft.name)
        .text("address", &draft.address)
        .text("city", &draft.city)
        .text("state", &draft.state)
        .text("zip_code", &draft.zip_code)
        .text("phone", &draft.phone)
        .text("email", &draft.email)
        .json("opening_hours", &draft.opening_hours)?
        .text_opt("map_url", draft.map_url.as_ref().filter(|u| !u.is_empty()))
        .text("is_active", draft.is_active);
    if !draft.gallery_images.is_empty() {
        body = body.json("gallery_images", &draft.gallery_images)?;
    }
    Ok(body.files("images", images))
}
