//! Encore Core Library
//!
//! Authorization (OAuth 2.0 + PKCE) and session lifecycle for the Encore
//! music client, plus the authenticated API surface and configuration
//! shared with the command-line shell.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use api::{ApiError, ProfileSource, ProviderApi, UserProfile};
pub use auth::{
    AuthError, BearerToken, Navigator, SessionContext, SessionLifecycleController, SessionState,
    SessionStore, TokenPair,
};
pub use config::{ClientConfig, ConfigLoader, LoggingConfig};
pub use error::{EncoreError, EncoreResult};
