//! Data transfer records mirroring the backend's JSON schema.
//!
//! Response records derive `Deserialize` (and `Serialize`, so the session can
//! persist a [`User`]); request records ("drafts" and "updates") derive
//! `Serialize` and skip absent optional fields so partial updates stay partial.

pub mod category;
pub mod media;
pub mod pagination;
pub mod product;
pub mod settings;
pub mod showroom;
pub mod stats;
pub mod user;
pub mod wishlist;

pub use category::{Category, CategoryDraft, slugify};
pub use media::resolve_media_url;
pub use pagination::Paginated;
pub use product::{Product, ProductDraft, ProductImage, ProductVariant, VariantDraft};
pub use settings::{
    BulkUpdateResult, PublicSettings, SettingUpdate, SettingValue, SettingValueType, SiteSetting,
};
pub use showroom::{Showroom, ShowroomDraft, WEEKDAYS};
pub use stats::AdminStats;
pub use user::{User, UserRoleUpdate, UserUpdate};
pub use wishlist::{WishlistAdd, WishlistItem};
