//! Public showroom listing.

use tracing::instrument;

use catalogue_client::ApiClient;
use catalogue_core::{Showroom, ShowroomId};

/// Active showrooms. A failed fetch is logged and reads as none.
#[instrument(skip(api))]
pub async fn active_showrooms(api: &ApiClient) -> Vec<Showroom> {
    match api.list_showrooms(true).await {
        Ok(showrooms) => showrooms,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load showrooms");
            Vec::new()
        }
    }
}

/// One showroom, or `None` when it is missing or cannot be fetched.
#[instrument(skip(api))]
pub async fn showroom(api: &ApiClient, id: ShowroomId) -> Option<Showroom> {
    match api.get_showroom(id).await {
        Ok(showroom) => Some(showroom),
        Err(e) if e.is_not_found() => None,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load showroom");
            None
        }
    }
}
