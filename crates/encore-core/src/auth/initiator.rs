//! Outbound half of the authorization round-trip

use super::error::AuthError;
use super::oauth::OAuthClient;
use super::pkce::CodeVerifier;
use super::store::SessionStore;
use tracing::info;

/// Host navigation surface
///
/// `assign` leaves the application for `url`; nothing after it is observed
/// by the caller. `replace` rewrites the visible address without navigating.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Address the application was started with
    fn current_url(&self) -> String;

    /// Full navigation away from the application
    fn assign(&self, url: &str);

    /// Replace the visible address in place
    fn replace(&self, url: &str);
}

/// Starts a login by redirecting to the provider
#[derive(Clone)]
pub struct AuthorizationInitiator {
    client: OAuthClient,
    store: SessionStore,
    verifier_length: usize,
}

impl AuthorizationInitiator {
    pub fn new(client: OAuthClient, store: SessionStore, verifier_length: usize) -> Self {
        Self {
            client,
            store,
            verifier_length,
        }
    }

    /// Persist a fresh verifier and navigate to the authorization endpoint.
    ///
    /// Only fails before navigation, when the verifier cannot be generated
    /// or persisted.
    pub fn start_login(&self, navigator: &dyn Navigator) -> Result<(), AuthError> {
        let verifier = CodeVerifier::generate(self.verifier_length)?;
        self.store.save_verifier(&verifier)?;

        let url = self.client.authorization_url(&verifier);
        info!(
            endpoint = %self.client.config().authorization_endpoint,
            "redirecting to provider for authorization"
        );
        navigator.assign(&url);
        Ok(())
    }
}
