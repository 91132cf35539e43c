//! OAuth 2.0 client for a public (secret-less) PKCE client
//!
//! Supports:
//! - Authorization request construction
//! - Authorization code exchange
//! - Token refresh

use super::error::AuthError;
use super::pkce::{CodeChallenge, CodeVerifier};
use super::token::{TokenPair, TokenResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// OAuth 2.0 endpoints and client registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Authorization endpoint URL
    pub authorization_endpoint: String,
    /// Token endpoint URL
    pub token_endpoint: String,
    /// Client ID
    pub client_id: String,
    /// Redirect URI registered with the provider
    pub redirect_uri: String,
    /// Scopes to request
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    /// Create new OAuth config
    pub fn new(
        authorization_endpoint: impl Into<String>,
        token_endpoint: impl Into<String>,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            authorization_endpoint: authorization_endpoint.into(),
            token_endpoint: token_endpoint.into(),
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scopes: Vec::new(),
        }
    }

    /// Add scope
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Add multiple scopes
    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = String>) -> Self {
        self.scopes.extend(scopes);
        self
    }
}

/// Parameters of the outbound authorization redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub challenge: CodeChallenge,
}

impl AuthorizationRequest {
    pub const RESPONSE_TYPE: &'static str = "code";

    /// Build the request for `challenge`
    pub fn new(config: &OAuthConfig, challenge: CodeChallenge) -> Self {
        Self {
            client_id: config.client_id.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scopes: config.scopes.clone(),
            challenge,
        }
    }

    /// Query parameters in the order the provider documents them
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("client_id", self.client_id.clone()),
            ("response_type", Self::RESPONSE_TYPE.to_string()),
            ("redirect_uri", self.redirect_uri.clone()),
            ("scope", self.scopes.join(" ")),
            ("code_challenge_method", self.challenge.method().to_string()),
            ("code_challenge", self.challenge.as_str().to_string()),
        ]
    }

    /// Full URL for `authorization_endpoint`
    pub fn to_url(&self, authorization_endpoint: &str) -> String {
        let query = self
            .query_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{authorization_endpoint}?{query}")
    }
}

/// OAuth 2.0 client
#[derive(Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Create a client with its own HTTP connection pool
    pub fn new(config: OAuthConfig, timeout: Duration) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::exchange(None, e.to_string()))?;
        Ok(Self::with_http_client(config, http_client))
    }

    /// Create a client sharing an existing HTTP client
    pub fn with_http_client(config: OAuthConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Authorization request for `verifier`
    pub fn authorization_request(&self, verifier: &CodeVerifier) -> AuthorizationRequest {
        AuthorizationRequest::new(&self.config, verifier.challenge())
    }

    /// Authorization URL for `verifier`
    pub fn authorization_url(&self, verifier: &CodeVerifier) -> String {
        self.authorization_request(verifier)
            .to_url(&self.config.authorization_endpoint)
    }

    /// Exchange authorization code for tokens
    pub async fn exchange_code(
        &self,
        code: &str,
        verifier: &CodeVerifier,
    ) -> Result<TokenPair, AuthError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code_verifier", verifier.as_str()),
        ];

        debug!(endpoint = %self.config.token_endpoint, "exchanging authorization code");
        let response = self.post_token_request(&params).await?;
        response.into_pair(Utc::now(), None)
    }

    /// Refresh access token
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        debug!(endpoint = %self.config.token_endpoint, "refreshing access token");
        let response = self.post_token_request(&params).await?;
        response.into_pair(Utc::now(), Some(refresh_token.to_string()))
    }

    async fn post_token_request(&self, params: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let response = self
            .http_client
            .post(&self.config.token_endpoint)
            .form(params)
            .send()
            .await
            .map_err(|e| AuthError::exchange(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(AuthError::exchange(Some(status.as_u16()), error_body));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::exchange(Some(status.as_u16()), e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> OAuthConfig {
        OAuthConfig::new(
            "https://accounts.example.com/authorize",
            "https://accounts.example.com/api/token",
            "test_client",
            "http://localhost:5173/callback",
        )
        .with_scope("user-read-private")
        .with_scope("user-read-email")
    }

    #[test]
    fn test_oauth_config() {
        let config = test_config().with_scopes(vec!["user-top-read".to_string()]);
        assert_eq!(config.scopes.len(), 3);
    }

    #[test]
    fn test_authorization_request_fields() {
        let verifier = CodeVerifier::generate(64).unwrap();
        let request = AuthorizationRequest::new(&test_config(), verifier.challenge());
        let pairs = request.query_pairs();

        let keys: Vec<_> = pairs.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec![
                "client_id",
                "response_type",
                "redirect_uri",
                "scope",
                "code_challenge_method",
                "code_challenge"
            ]
        );
        assert!(pairs.contains(&("response_type", "code".to_string())));
        assert!(pairs.contains(&("code_challenge_method", "S256".to_string())));
        assert!(pairs.contains(&("code_challenge", verifier.challenge().as_str().to_string())));
        assert!(pairs.contains(&("scope", "user-read-private user-read-email".to_string())));
    }

    #[test]
    fn test_authorization_url() {
        let client =
            OAuthClient::new(test_config(), Duration::from_secs(5)).expect("client builds");
        let verifier = CodeVerifier::generate(43).unwrap();
        let url = client.authorization_url(&verifier);

        assert!(url.starts_with("https://accounts.example.com/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=test_client"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A5173%2Fcallback"));
        assert!(url.contains("scope=user-read-private%20user-read-email"));
        assert!(url.contains(&format!("code_challenge={}", verifier.challenge().as_str())));
        assert!(url.contains("code_challenge_method=S256"));
        assert!(!url.contains(verifier.as_str()));
    }
}
