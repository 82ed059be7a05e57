//! Form validation errors.
//!
//! These are caught before anything is sent to the backend and shown inline
//! on the form, exactly like a backend `detail`.

use thiserror::Error;

use catalogue_core::EmailError;

/// A form failed client-side validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter a valid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("{0} is required")]
    Required(&'static str),
}
