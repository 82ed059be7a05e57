//! Catalogue Core - Shared types library.
//!
//! This crate provides the types shared by every catalogue component:
//! - `client` - Session store and authenticated backend API client
//! - `storefront` - Catalog, product, account and wishlist controllers
//! - `admin` - Back-office CRUD screens
//! - `cli` - Terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The records
//! under [`models`] mirror the backend's JSON schema one-to-one; the backend
//! owns every business rule, so the only logic here is the handful of derived
//! values the UI needs (display image, total stock).
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and emails
//! - [`models`] - Data transfer records for backend resources

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
