//! Core error type

use crate::api::ApiError;
use crate::auth::AuthError;
use thiserror::Error;

/// Result type alias for Encore operations
pub type EncoreResult<T> = Result<T, EncoreError>;

/// Main error type for Encore
#[derive(Error, Debug, Clone)]
pub enum EncoreError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Authorization flow errors
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Web API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },
}

impl EncoreError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "ENCORE_CONFIG",
            Self::Auth(AuthError::MissingVerifier) => "ENCORE_AUTH_MISSING_VERIFIER",
            Self::Auth(AuthError::ExchangeFailed { .. }) => "ENCORE_AUTH_EXCHANGE_FAILED",
            Self::Auth(AuthError::NoSession) => "ENCORE_NO_SESSION",
            Self::Auth(_) => "ENCORE_AUTH",
            Self::Api(_) => "ENCORE_API",
            Self::Io { .. } => "ENCORE_IO",
            Self::Json { .. } => "ENCORE_JSON",
        }
    }

    /// Additional context, if any
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } => context.as_deref(),
            Self::Io { path, .. } => path.as_deref(),
            _ => None,
        }
    }
}
