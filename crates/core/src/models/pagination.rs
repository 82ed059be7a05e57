//! Paginated list responses.

use serde::{Deserialize, Serialize};

/// One page of a server-side paginated listing.
///
/// `page` is 1-based. The server is the source of truth for `total` and
/// `pages`; the client never paginates a full list itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub pages: u32,
}

impl<T> Paginated<T> {
    /// A single empty page, used when a listing cannot be loaded.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            size: 0,
            pages: 1,
        }
    }

    /// Whether a page after this one exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self::empty()
    }
}
