//! Showroom management.

use tracing::instrument;

use catalogue_client::{ApiClient, Upload};
use catalogue_core::{Showroom, ShowroomDraft, ShowroomId};

use crate::confirm::Confirm;
use crate::crud::CrudScreen;
use crate::error::CrudError;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this showroom?";

const NEW_SHOWROOM: ShowroomId = ShowroomId::new(0);

#[derive(Debug)]
pub struct ShowroomsScreen {
    api: ApiClient,
    crud: CrudScreen<ShowroomId, Showroom>,
}

impl ShowroomsScreen {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            crud: CrudScreen::new(),
        }
    }

    /// Every showroom, active or not.
    #[must_use]
    pub fn showrooms(&self) -> Vec<Showroom> {
        self.crud.rows()
    }

    #[must_use]
    pub const fn crud(&self) -> &CrudScreen<ShowroomId, Showroom> {
        &self.crud
    }

    #[instrument(skip(self))]
    pub async fn load(&self) {
        match self.api.list_showrooms(false).await {
            Ok(showrooms) => self.crud.set_rows(showrooms),
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch showrooms");
                self.crud.set_rows(Vec::new());
            }
        }
    }

    /// Fetch one showroom for the edit form.
    ///
    /// # Errors
    ///
    /// Returns `CrudError::Rejected` with "Failed to load showroom" or the
    /// backend detail.
    pub async fn showroom(&self, id: ShowroomId) -> Result<Showroom, CrudError> {
        self.api
            .get_showroom(id)
            .await
            .map_err(|e| CrudError::rejected(e, "Failed to load showroom"))
    }

    /// # Errors
    ///
    /// Returns `CrudError` if a create is in flight or the backend rejects it.
    #[instrument(skip(self, draft, images), fields(name = %draft.name))]
    pub async fn create(&self, draft: &ShowroomDraft, images: &[Upload]) -> Result<Showroom, CrudError> {
        let showroom = self
            .crud
            .mutate(
                NEW_SHOWROOM,
                "Failed to save showroom",
                self.api.create_showroom(draft, images),
            )
            .await?;
        self.load().await;
        Ok(showroom)
    }

    /// # Errors
    ///
    /// Returns `CrudError` if the row is busy or the backend rejects it.
    #[instrument(skip(self, draft, images))]
    pub async fn update(
        &self,
        id: ShowroomId,
        draft: &ShowroomDraft,
        images: &[Upload],
    ) -> Result<Showroom, CrudError> {
        let showroom = self
            .crud
            .mutate(
                id,
                "Failed to save showroom",
                self.api.update_showroom(id, draft, images),
            )
            .await?;
        self.load().await;
        Ok(showroom)
    }

    /// # Errors
    ///
    /// Returns `CrudError::Cancelled` if declined, otherwise as
    /// [`CrudScreen::mutate`].
    #[instrument(skip(self, confirm))]
    pub async fn delete(&self, id: ShowroomId, confirm: &dyn Confirm) -> Result<(), CrudError> {
        self.crud
            .delete(
                id,
                confirm,
                DELETE_PROMPT,
                "Failed to delete showroom",
                self.api.delete_showroom(id),
            )
            .await?;
        self.load().await;
        Ok(())
    }
}
