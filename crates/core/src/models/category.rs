//! Category records.
//!
//! The backend returns root categories with their children nested. Slug lookups
//! (catalog URLs use slugs, the product search uses ids) walk the whole tree.

use serde::{Deserialize, Serialize};

use crate::types::CategoryId;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default)]
    pub children: Vec<Self>,
}

const fn default_true() -> bool {
    true
}

impl Category {
    /// This category followed by all of its descendants, depth first.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Self> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }

    /// Find a category by slug (case-insensitive) anywhere in a forest.
    #[must_use]
    pub fn find_by_slug<'a>(forest: &'a [Self], slug: &str) -> Option<&'a Self> {
        forest
            .iter()
            .flat_map(Self::descendants)
            .find(|c| c.slug.eq_ignore_ascii_case(slug.trim()))
    }

    /// Find a category by id anywhere in a forest.
    #[must_use]
    pub fn find_by_id(forest: &[Self], id: CategoryId) -> Option<&Self> {
        forest
            .iter()
            .flat_map(Self::descendants)
            .find(|c| c.id == id)
    }
}

/// Category fields sent on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
}

impl CategoryDraft {
    /// A new active root category with a slug derived from its name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.trim().to_owned(),
            slug: slugify(name),
            description: None,
            image_url: None,
            is_active: true,
            parent_id: None,
        }
    }
}

impl From<&Category> for CategoryDraft {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            image_url: category.image_url.clone(),
            is_active: category.is_active,
            parent_id: category.parent_id,
        }
    }
}

/// Lowercase, ASCII-alphanumeric words joined by single hyphens.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
