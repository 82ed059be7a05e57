//! Category management.

use tracing::instrument;

use catalogue_client::{ApiClient, Upload};
use catalogue_core::{Category, CategoryDraft, CategoryId};

use crate::confirm::Confirm;
use crate::crud::CrudScreen;
use crate::error::CrudError;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this category?";

const NEW_CATEGORY: CategoryId = CategoryId::new(0);

#[derive(Debug)]
pub struct CategoriesScreen {
    api: ApiClient,
    crud: CrudScreen<CategoryId, Category>,
}

impl CategoriesScreen {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            crud: CrudScreen::new(),
        }
    }

    /// Root categories with their children nested.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.crud.rows()
    }

    #[must_use]
    pub const fn crud(&self) -> &CrudScreen<CategoryId, Category> {
        &self.crud
    }

    #[instrument(skip(self))]
    pub async fn load(&self) {
        match self.api.list_categories().await {
            Ok(categories) => self.crud.set_rows(categories),
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch categories");
                self.crud.set_rows(Vec::new());
            }
        }
    }

    /// Create an active root category named `name` with a derived slug.
    ///
    /// # Errors
    ///
    /// Returns `CrudError` if the backend rejects it.
    pub async fn create_named(&self, name: &str) -> Result<Category, CrudError> {
        self.create(&CategoryDraft::named(name)).await
    }

    /// # Errors
    ///
    /// Returns `CrudError` if a create is in flight or the backend rejects it.
    #[instrument(skip(self), fields(slug = %draft.slug))]
    pub async fn create(&self, draft: &CategoryDraft) -> Result<Category, CrudError> {
        let category = self
            .crud
            .mutate(
                NEW_CATEGORY,
                "Failed to save category",
                self.api.create_category(draft),
            )
            .await?;
        self.load().await;
        Ok(category)
    }

    /// # Errors
    ///
    /// Returns `CrudError` if the row is busy or the backend rejects it.
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: CategoryId, draft: &CategoryDraft) -> Result<Category, CrudError> {
        let category = self
            .crud
            .mutate(id, "Failed to save category", self.api.update_category(id, draft))
            .await?;
        self.load().await;
        Ok(category)
    }

    /// Upload a new image for a category.
    ///
    /// # Errors
    ///
    /// Returns `CrudError` if the row is busy or the backend rejects it.
    #[instrument(skip(self, image), fields(file = %image.file_name))]
    pub async fn upload_image(&self, id: CategoryId, image: &Upload) -> Result<Category, CrudError> {
        let category = self
            .crud
            .mutate(
                id,
                "Failed to upload category image",
                self.api.upload_category_image(id, image),
            )
            .await?;
        self.load().await;
        Ok(category)
    }

    /// # Errors
    ///
    /// Returns `CrudError::Cancelled` if declined, otherwise as
    /// [`CrudScreen::mutate`].
    #[instrument(skip(self, confirm))]
    pub async fn delete(&self, id: CategoryId, confirm: &dyn Confirm) -> Result<(), CrudError> {
        self.crud
            .delete(
                id,
                confirm,
                DELETE_PROMPT,
                "Failed to delete category",
                self.api.delete_category(id),
            )
            .await?;
        self.load().await;
        Ok(())
    }
}
