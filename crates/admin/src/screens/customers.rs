//! Customer accounts: grant or revoke admin, activate or deactivate.

use tracing::instrument;

use catalogue_client::ApiClient;
use catalogue_core::{User, UserId, UserRoleUpdate};

use crate::crud::CrudScreen;
use crate::error::CrudError;

#[derive(Debug)]
pub struct CustomersScreen {
    api: ApiClient,
    crud: CrudScreen<UserId, User>,
}

impl CustomersScreen {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            crud: CrudScreen::new(),
        }
    }

    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.crud.rows()
    }

    #[must_use]
    pub const fn crud(&self) -> &CrudScreen<UserId, User> {
        &self.crud
    }

    #[instrument(skip(self))]
    pub async fn load(&self) {
        match self.api.list_users().await {
            Ok(users) => self.crud.set_rows(users),
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch users");
                self.crud.set_rows(Vec::new());
            }
        }
    }

    /// Flip the user's admin role.
    ///
    /// # Errors
    ///
    /// Returns `CrudError` if the user is not listed, the row is busy or the
    /// backend rejects the change.
    #[instrument(skip(self))]
    pub async fn toggle_admin(&self, id: UserId) -> Result<User, CrudError> {
        let user = self.listed(id)?;
        let update = UserRoleUpdate {
            is_superuser: Some(!user.is_superuser),
            ..UserRoleUpdate::default()
        };
        self.apply(id, update, "Failed to update user role").await
    }

    /// Flip the user's active status.
    ///
    /// # Errors
    ///
    /// Returns `CrudError` if the user is not listed, the row is busy or the
    /// backend rejects the change.
    #[instrument(skip(self))]
    pub async fn toggle_active(&self, id: UserId) -> Result<User, CrudError> {
        let user = self.listed(id)?;
        let update = UserRoleUpdate {
            is_active: Some(!user.is_active),
            ..UserRoleUpdate::default()
        };
        self.apply(id, update, "Failed to update user status").await
    }

    async fn apply(&self, id: UserId, update: UserRoleUpdate, fallback: &str) -> Result<User, CrudError> {
        let user = self
            .crud
            .mutate(id, fallback, self.api.update_user_role(id, update))
            .await?;
        self.load().await;
        Ok(user)
    }

    fn listed(&self, id: UserId) -> Result<User, CrudError> {
        self.crud
            .find(|user| user.id == id)
            .ok_or_else(|| CrudError::NotFound(format!("user {id}")))
    }
}
