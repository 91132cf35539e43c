//! Client configuration model

use super::defaults::*;
use super::logging_config::LoggingConfig;
use crate::auth::{FileStore, MAX_VERIFIER_LENGTH, MIN_VERIFIER_LENGTH, OAuthConfig, StoreError};
use crate::error::{EncoreError, EncoreResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Everything the client needs to talk to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Client ID registered with the provider
    pub client_id: String,
    /// Redirect target registered with the provider
    pub redirect_uri: String,
    /// Requested scopes
    pub scopes: Vec<String>,
    /// Accounts service base URL
    pub accounts_base_url: String,
    /// Web API base URL
    pub api_base_url: String,
    /// PKCE verifier length (43-128)
    pub verifier_length: usize,
    /// Timeout for every outbound request
    pub request_timeout_secs: u64,
    /// Refresh window before access token expiry
    pub refresh_leeway_secs: u64,
    /// Session file; `~/.encore/session.json` when unset
    pub store_path: Option<PathBuf>,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            accounts_base_url: DEFAULT_ACCOUNTS_BASE_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            verifier_length: DEFAULT_VERIFIER_LENGTH,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            refresh_leeway_secs: DEFAULT_REFRESH_LEEWAY_SECS,
            store_path: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl ClientConfig {
    /// `{accounts}/authorize`
    pub fn authorization_endpoint(&self) -> String {
        format!("{}/authorize", self.accounts_base_url.trim_end_matches('/'))
    }

    /// `{accounts}/api/token`
    pub fn token_endpoint(&self) -> String {
        format!("{}/api/token", self.accounts_base_url.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Refresh leeway, capped at [`MAX_REFRESH_LEEWAY_SECS`]
    pub fn refresh_leeway(&self) -> chrono::Duration {
        let secs = self.refresh_leeway_secs.min(MAX_REFRESH_LEEWAY_SECS);
        chrono::Duration::seconds(secs as i64)
    }

    /// OAuth settings derived from this config
    pub fn oauth_config(&self) -> OAuthConfig {
        OAuthConfig::new(
            self.authorization_endpoint(),
            self.token_endpoint(),
            self.client_id.clone(),
            self.redirect_uri.clone(),
        )
        .with_scopes(self.scopes.clone())
    }

    /// File store at `store_path`, or the default location
    pub fn file_store(&self) -> Result<FileStore, StoreError> {
        match &self.store_path {
            Some(path) => Ok(FileStore::new(path.clone())),
            None => FileStore::default_location(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> EncoreResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(EncoreError::config_with_context(
                "client_id is required",
                "set it in the config file or ENCORE_CLIENT_ID",
            ));
        }

        Url::parse(&self.redirect_uri).map_err(|e| {
            EncoreError::config(format!("Invalid redirect_uri '{}': {}", self.redirect_uri, e))
        })?;

        for (name, value) in [
            ("accounts_base_url", &self.accounts_base_url),
            ("api_base_url", &self.api_base_url),
        ] {
            Url::parse(value)
                .map_err(|e| EncoreError::config(format!("Invalid {name} '{value}': {e}")))?;
        }

        if !(MIN_VERIFIER_LENGTH..=MAX_VERIFIER_LENGTH).contains(&self.verifier_length) {
            return Err(EncoreError::config(format!(
                "verifier_length must be {}-{}, got {}",
                MIN_VERIFIER_LENGTH, MAX_VERIFIER_LENGTH, self.verifier_length
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(EncoreError::config("request_timeout_secs must be greater than 0"));
        }

        if self.refresh_leeway_secs > MAX_REFRESH_LEEWAY_SECS {
            return Err(EncoreError::config(format!(
                "refresh_leeway_secs must be at most {}, got {}",
                MAX_REFRESH_LEEWAY_SECS, self.refresh_leeway_secs
            )));
        }

        Ok(())
    }
}
