//! Web API client authenticated with the session's bearer token

use super::profile::UserProfile;
use crate::auth::BearerToken;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Something that can resolve the signed-in user's profile
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn profile(&self, token: &BearerToken) -> Result<UserProfile, ApiError>;
}

/// API errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The provider rejected the bearer token
    #[error("Access token rejected")]
    Unauthorized,

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Provider Web API client
#[derive(Clone)]
pub struct ProviderApi {
    base_url: String,
    http_client: reqwest::Client,
}

impl ProviderApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self::with_http_client(base_url, http_client))
    }

    pub fn with_http_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        }
    }

    /// `GET /v1/me`
    pub async fn current_user(&self, token: &BearerToken) -> Result<UserProfile, ApiError> {
        self.get_json("/v1/me", token).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &BearerToken,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, token.authorization_header())
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json()
                .await
                .map_err(|e| ApiError::Parse(e.to_string())),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status => Err(ApiError::Http {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl ProfileSource for ProviderApi {
    async fn profile(&self, token: &BearerToken) -> Result<UserProfile, ApiError> {
        self.current_user(token).await
    }
}
