//! From trait implementations for EncoreError conversions

use super::types::EncoreError;
use crate::auth::{AuthError, StoreError};

impl From<serde_json::Error> for EncoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<StoreError> for EncoreError {
    fn from(error: StoreError) -> Self {
        Self::Auth(AuthError::Storage(error))
    }
}
