//! Catalogue Admin library.
//!
//! Back-office screens. Each screen keeps its rows in a [`crud::CrudScreen`],
//! which serializes changes per row, turns backend failures into operator
//! alerts and asks for confirmation before deletes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod confirm;
pub mod crud;
pub mod error;
pub mod screens;

pub use access::{AdminAccess, check_access};
pub use confirm::{AutoConfirm, Confirm};
pub use crud::CrudScreen;
pub use error::CrudError;
