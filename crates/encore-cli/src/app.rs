//! Wiring from configuration to the session controller

use encore_core::auth::{OAuthClient, SessionLifecycleController, SessionStore};
use encore_core::config::{ClientConfig, ConfigLoader};
use encore_core::error::EncoreResult;
use encore_core::{Navigator, ProviderApi};
use std::sync::Arc;

/// Load configuration from defaults, `config_file` and the environment
pub fn load_config(config_file: &str) -> EncoreResult<ClientConfig> {
    ConfigLoader::new()
        .with_defaults()
        .with_file(config_file)
        .with_env()
        .load()
}

/// Build a controller over the configured session file
pub fn build_controller(
    config: &ClientConfig,
    navigator: Arc<dyn Navigator>,
) -> EncoreResult<SessionLifecycleController> {
    let store = SessionStore::new(Arc::new(config.file_store()?));
    let client = OAuthClient::new(config.oauth_config(), config.request_timeout())?;
    let api = ProviderApi::new(config.api_base_url.as_str(), config.request_timeout())?;

    Ok(
        SessionLifecycleController::new(client, store, navigator, Arc::new(api))
            .with_verifier_length(config.verifier_length)
            .with_refresh_leeway(config.refresh_leeway()),
    )
}
