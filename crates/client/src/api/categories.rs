//! Category tree and admin category management.

use reqwest::Method;
use tracing::instrument;

use catalogue_core::{Category, CategoryDraft, CategoryId};

use super::{ApiClient, Auth, MultipartBody, Upload};
use crate::error::ApiError;

impl ApiClient {
    /// All categories, as a forest of root categories with nested children.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_json("/categories", &[]).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's reason on rejection.
    #[instrument(skip(self))]
    pub async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, ApiError> {
        self.send_json(Auth::Bearer, Method::POST, "/categories", draft)
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's reason on rejection.
    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, ApiError> {
        self.send_json(Auth::Bearer, Method::PUT, &format!("/categories/{id}"), draft)
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's reason on rejection.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<Category, ApiError> {
        self.delete_json(&format!("/categories/{id}")).await
    }

    /// Replace a category's image.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's reason on rejection.
    #[instrument(skip(self, image), fields(file = %image.file_name))]
    pub async fn upload_category_image(
        &self,
        id: CategoryId,
        image: &Upload,
    ) -> Result<Category, ApiError> {
        let body = MultipartBody::new().files("file", std::slice::from_ref(image));
        self.send_multipart(Method::POST, &format!("/categories/{id}/image"), &body)
            .await
    }
}
