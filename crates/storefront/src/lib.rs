//! Catalogue Storefront library.
//!
//! Page controllers for the public shop. Each controller owns the state of
//! one page, talks to the backend through [`catalogue_client::ApiClient`] and
//! records URL changes in a [`navigation::Navigator`] instead of rendering.
//!
//! # Modules
//!
//! - [`catalog`] - Filterable, paginated product listing synced with the URL
//! - [`product`] - Product detail with gallery and related products
//! - [`auth`] - Login and registration
//! - [`profile`] - Account profile
//! - [`wishlist`] - Saved products
//! - [`showrooms`] - Store locations
//! - [`store`] - Store name and contact details

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod catalog;
pub mod categories;
pub mod error;
pub mod navigation;
pub mod product;
pub mod profile;
pub mod showrooms;
pub mod state;
pub mod store;
pub mod wishlist;

pub use state::Storefront;
