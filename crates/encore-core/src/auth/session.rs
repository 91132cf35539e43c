//! Session lifecycle
//!
//! `init` runs once per application start and picks exactly one of:
//! 1. return from authorization: the address carries `code`, redeem it
//! 2. existing session: the store holds a token pair
//! 3. no session
//!
//! Every failure inside `init` is logged, kept as [`last_error`], and turned
//! into an anonymous outcome.
//!
//! [`last_error`]: SessionLifecycleController::last_error

use super::error::AuthError;
use super::exchange::TokenExchangeHandler;
use super::initiator::{AuthorizationInitiator, Navigator};
use super::oauth::OAuthClient;
use super::pkce::MAX_VERIFIER_LENGTH;
use super::store::SessionStore;
use super::token::{BearerToken, TokenPair};
use crate::api::{ProfileSource, UserProfile};
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Query parameters the provider appends to the redirect target
const RETURN_PARAMS: &[&str] = &["code", "state", "error", "error_description"];

/// Whether a token pair is present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// Resolved session handed to the shell
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub token: BearerToken,
    pub profile: UserProfile,
}

/// What the current address says about an authorization round-trip
#[derive(Debug, Clone, PartialEq, Eq)]
enum AuthorizationReturn {
    Code(String),
    Error(String),
    None,
}

impl AuthorizationReturn {
    fn parse(location: &str) -> Self {
        let Ok(url) = Url::parse(location) else {
            return Self::None;
        };

        let mut error = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" if !value.is_empty() => return Self::Code(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                _ => {}
            }
        }

        error.map_or(Self::None, Self::Error)
    }
}

/// `location` without the authorization return parameters
fn strip_return_params(location: &str) -> String {
    let Ok(mut url) = Url::parse(location) else {
        return location.to_string();
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !RETURN_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    url.to_string()
}

/// Orchestrates login, logout and startup session resolution
pub struct SessionLifecycleController {
    client: OAuthClient,
    store: SessionStore,
    initiator: AuthorizationInitiator,
    exchange: TokenExchangeHandler,
    navigator: Arc<dyn Navigator>,
    profiles: Arc<dyn ProfileSource>,
    refresh_leeway: Duration,
    last_error: Mutex<Option<AuthError>>,
}

impl SessionLifecycleController {
    /// Controller with a 128-character verifier and a 60 second refresh leeway
    pub fn new(
        client: OAuthClient,
        store: SessionStore,
        navigator: Arc<dyn Navigator>,
        profiles: Arc<dyn ProfileSource>,
    ) -> Self {
        Self {
            initiator: AuthorizationInitiator::new(
                client.clone(),
                store.clone(),
                MAX_VERIFIER_LENGTH,
            ),
            exchange: TokenExchangeHandler::new(client.clone(), store.clone()),
            client,
            store,
            navigator,
            profiles,
            refresh_leeway: Duration::seconds(60),
            last_error: Mutex::new(None),
        }
    }

    pub fn with_verifier_length(mut self, verifier_length: usize) -> Self {
        self.initiator =
            AuthorizationInitiator::new(self.client.clone(), self.store.clone(), verifier_length);
        self
    }

    pub fn with_refresh_leeway(mut self, leeway: Duration) -> Self {
        self.refresh_leeway = leeway;
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Start a login; control continues in a later `init` after the redirect
    pub fn login(&self) -> Result<(), AuthError> {
        self.initiator.start_login(self.navigator.as_ref())
    }

    /// Forget the session; the shell re-renders as anonymous
    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.clear()?;
        info!("logged out");
        Ok(())
    }

    /// Stored access token, if any
    pub fn access_token(&self) -> Option<String> {
        match self.store.access_token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "failed to read access token");
                None
            }
        }
    }

    /// Bearer credential for API collaborators
    pub fn bearer(&self) -> Result<BearerToken, AuthError> {
        self.store.bearer()?.ok_or(AuthError::NoSession)
    }

    /// State derived from the store; no freshness check
    pub fn state(&self) -> SessionState {
        match self.access_token() {
            Some(_) => SessionState::Authenticated,
            None => SessionState::Anonymous,
        }
    }

    /// Failure recorded by the last `init`, if it degraded to anonymous
    pub fn last_error(&self) -> Option<AuthError> {
        self.last_error.lock().clone()
    }

    /// Resolve the session for this application start.
    ///
    /// Never fails: errors are logged and recorded, and the outcome is `None`.
    pub async fn init(&self) -> Option<SessionContext> {
        self.last_error.lock().take();

        match self.resolve().await {
            Ok(Some(context)) => {
                info!(user = %context.profile.id, "session authenticated");
                Some(context)
            }
            Ok(None) => {
                debug!("no session, continuing anonymously");
                None
            }
            Err(e) => {
                warn!(error = %e, "session init failed, continuing anonymously");
                *self.last_error.lock() = Some(e);
                None
            }
        }
    }

    async fn resolve(&self) -> Result<Option<SessionContext>, AuthError> {
        let location = self.navigator.current_url();

        let pair = match AuthorizationReturn::parse(&location) {
            AuthorizationReturn::Code(code) => {
                debug!("authorization code present, exchanging");
                // A freshly issued pair is used as is, whatever its lifetime
                let pair = self.exchange.exchange(&code).await?;
                self.navigator.replace(&strip_return_params(&location));
                Some(pair)
            }
            AuthorizationReturn::Error(reason) => {
                // The flow this verifier belonged to is over
                self.store.take_verifier()?;
                self.navigator.replace(&strip_return_params(&location));
                warn!(%reason, "provider returned an authorization error");
                *self.last_error.lock() = Some(AuthError::AuthorizationDenied(reason));
                self.current_pair().await?
            }
            AuthorizationReturn::None => self.current_pair().await?,
        };

        let Some(pair) = pair else {
            return Ok(None);
        };

        let token = pair.bearer();
        let profile = self.profiles.profile(&token).await?;
        Ok(Some(SessionContext { token, profile }))
    }

    /// Stored pair, refreshed first if it is about to expire
    async fn current_pair(&self) -> Result<Option<TokenPair>, AuthError> {
        let Some(pair) = self.store.tokens()? else {
            return Ok(None);
        };

        if !pair.expires_within(self.refresh_leeway, Utc::now()) {
            return Ok(Some(pair));
        }

        if pair.refresh_token.is_none() {
            debug!("access token expiring and no refresh token, using it as is");
            return Ok(Some(pair));
        }

        match self.exchange.refresh(&pair).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(e) => {
                self.store.clear()?;
                Err(e)
            }
        }
    }
}
