//! Error types for Encore
//!
//! Module-level errors (`AuthError`, `ApiError`, `StoreError`) convert into
//! [`EncoreError`], which carries a stable error code for the shell.

mod constructors;
mod conversions;
mod types;

pub use types::{EncoreError, EncoreResult};
