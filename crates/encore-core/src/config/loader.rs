//! Configuration loading

use super::client_config::ClientConfig;
use super::logging_config::LogFormat;
use crate::error::{EncoreError, EncoreResult};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration from a file; skipped if the file does not exist
    File(PathBuf),
    /// Configuration from `ENCORE_*` environment variables
    Environment,
    /// Default configuration
    Default,
}

/// Configuration loader with support for multiple sources
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add default configuration source
    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Apply all sources in order and validate the result
    pub fn load(self) -> EncoreResult<ClientConfig> {
        let config = self.load_unvalidated()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply all sources in order without validating
    pub fn load_unvalidated(self) -> EncoreResult<ClientConfig> {
        let mut config = ClientConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::Default => config = ClientConfig::default(),
                ConfigSource::File(path) => {
                    if path.exists() {
                        tracing::debug!("Loading configuration from {}", path.display());
                        config = load_config_from_file(path)?;
                    } else {
                        tracing::debug!("Configuration file not found: {}", path.display());
                    }
                }
                ConfigSource::Environment => apply_env(&mut config, |key| env::var(key).ok())?,
            }
        }

        Ok(config)
    }
}

/// Parse a JSON configuration file; absent fields take their defaults
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> EncoreResult<ClientConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        EncoreError::io_with_path(format!("Failed to read config file: {e}"), path.display().to_string())
    })?;

    serde_json::from_str(&content).map_err(|e| {
        EncoreError::config_with_context(
            format!("Failed to parse config file: {e}"),
            path.display().to_string(),
        )
    })
}

/// Override fields from environment variables read through `lookup`
pub(crate) fn apply_env<F>(config: &mut ClientConfig, lookup: F) -> EncoreResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(client_id) = lookup("ENCORE_CLIENT_ID") {
        config.client_id = client_id;
    }

    if let Some(redirect_uri) = lookup("ENCORE_REDIRECT_URI") {
        config.redirect_uri = redirect_uri;
    }

    if let Some(scopes) = lookup("ENCORE_SCOPES") {
        config.scopes = scopes
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(url) = lookup("ENCORE_ACCOUNTS_URL") {
        config.accounts_base_url = url;
    }

    if let Some(url) = lookup("ENCORE_API_URL") {
        config.api_base_url = url;
    }

    if let Some(path) = lookup("ENCORE_STORE_PATH") {
        config.store_path = Some(PathBuf::from(path));
    }

    if let Some(secs) = lookup("ENCORE_REQUEST_TIMEOUT_SECS") {
        config.request_timeout_secs = secs
            .parse()
            .map_err(|_| EncoreError::config("Invalid ENCORE_REQUEST_TIMEOUT_SECS value"))?;
    }

    if let Some(level) = lookup("ENCORE_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Some(format) = lookup("ENCORE_LOG_FORMAT") {
        config.logging.format = match format.to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            "json" => LogFormat::Json,
            other => {
                return Err(EncoreError::config(format!(
                    "Invalid ENCORE_LOG_FORMAT value: {other}"
                )));
            }
        };
    }

    Ok(())
}
