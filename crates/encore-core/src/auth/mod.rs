//! Authorization and session lifecycle
//!
//! Provides:
//! - PKCE verifier/challenge generation
//! - Durable session storage for the in-flight verifier and token pair
//! - Authorization redirect and code exchange
//! - Startup session resolution, login and logout

mod error;
mod exchange;
mod initiator;
mod oauth;
mod pkce;
mod session;
mod store;
mod token;

pub use error::AuthError;
pub use exchange::TokenExchangeHandler;
pub use initiator::{AuthorizationInitiator, Navigator};
pub use oauth::{AuthorizationRequest, OAuthClient, OAuthConfig};
pub use pkce::{
    CHALLENGE_METHOD, CodeChallenge, CodeVerifier, MAX_VERIFIER_LENGTH, MIN_VERIFIER_LENGTH,
    PkceError,
};
pub use session::{SessionContext, SessionLifecycleController, SessionState};
pub use store::{FileStore, KeyValueStore, MemoryStore, SessionStore, StoreError};
pub use token::{BearerToken, TokenPair};
