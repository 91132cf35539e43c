//! Inbound half of the authorization round-trip

use super::error::AuthError;
use super::oauth::OAuthClient;
use super::store::SessionStore;
use super::token::TokenPair;
use tracing::{info, warn};

/// Redeems an authorization code with the in-flight verifier
#[derive(Clone)]
pub struct TokenExchangeHandler {
    client: OAuthClient,
    store: SessionStore,
}

impl TokenExchangeHandler {
    pub fn new(client: OAuthClient, store: SessionStore) -> Self {
        Self { client, store }
    }

    /// Exchange `code` for a token pair and persist it.
    ///
    /// The verifier is removed from the store before any request is made, so
    /// it is gone whatever the outcome; without one no request is made at all.
    /// Network failures are not retried.
    pub async fn exchange(&self, code: &str) -> Result<TokenPair, AuthError> {
        let verifier = self
            .store
            .take_verifier()?
            .ok_or(AuthError::MissingVerifier)?;

        let pair = match self.client.exchange_code(code, &verifier).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "authorization code exchange failed");
                return Err(e);
            }
        };

        self.store.save_tokens(&pair)?;
        info!(
            has_refresh_token = pair.refresh_token.is_some(),
            "authorization code exchanged"
        );
        Ok(pair)
    }

    /// Trade the stored refresh token for a new pair and persist it
    pub async fn refresh(&self, current: &TokenPair) -> Result<TokenPair, AuthError> {
        let refresh_token = current
            .refresh_token
            .as_deref()
            .ok_or(AuthError::NoSession)?;

        let pair = self.client.refresh_token(refresh_token).await?;
        self.store.save_tokens(&pair)?;
        info!("access token refreshed");
        Ok(pair)
    }
}
