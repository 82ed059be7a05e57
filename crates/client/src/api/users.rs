//! Current-user profile and admin user management.

use reqwest::Method;
use tracing::instrument;

use catalogue_core::{User, UserId, UserRoleUpdate, UserUpdate};

use super::{ApiClient, Auth};
use crate::error::ApiError;

impl ApiClient {
    /// Fetch the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when no valid session exists.
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<User, ApiError> {
        self.get_json("/users/me", &[]).await
    }

    /// Update the signed-in user's name, email or password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` when the backend rejects the update.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User, ApiError> {
        self.send_json(Auth::Bearer, Method::PUT, "/users/me", update)
            .await
    }

    /// List all users. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` (403) for non-admins.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json("/users", &[]).await
    }

    /// Change a user's admin flag or active status. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` when the backend rejects the change.
    #[instrument(skip(self))]
    pub async fn update_user_role(
        &self,
        id: UserId,
        update: UserRoleUpdate,
    ) -> Result<User, ApiError> {
        self.send_json(Auth::Bearer, Method::PUT, &format!("/users/{id}"), &update)
            .await
    }
}
