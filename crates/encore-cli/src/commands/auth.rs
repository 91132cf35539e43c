//! Session commands: login, callback, status, token, logout

use crate::app::{build_controller, load_config};
use crate::console::CliConsole;
use crate::navigator::TerminalNavigator;
use encore_core::auth::{AuthError, SessionContext};
use encore_core::config::ClientConfig;
use encore_core::error::{EncoreError, EncoreResult};
use std::sync::Arc;

/// Persist a verifier and send the user to the authorization page
pub async fn login(config_file: &str, no_browser: bool) -> EncoreResult<()> {
    let console = CliConsole::new(true);
    let config = load_config(config_file)?;
    let navigator = TerminalNavigator::new(config.redirect_uri.clone(), !no_browser);
    let controller = build_controller(&config, Arc::new(navigator))?;

    controller.login()?;

    console.info("After approving access, copy the address your browser lands on and run:");
    println!("  encore callback '<redirected URL>'");
    Ok(())
}

/// Finish a login from the provider's redirect
pub async fn callback(config_file: &str, url: &str) -> EncoreResult<()> {
    let config = load_config(config_file)?;
    resolve(&config, url).await
}

/// Resolve and display the stored session
pub async fn status(config_file: &str) -> EncoreResult<()> {
    let config = load_config(config_file)?;
    resolve(&config, &config.redirect_uri).await
}

async fn resolve(config: &ClientConfig, location: &str) -> EncoreResult<()> {
    let console = CliConsole::new(true);
    let navigator = TerminalNavigator::new(location, false);
    let controller = build_controller(config, Arc::new(navigator))?;

    match controller.init().await {
        Some(context) => {
            print_session(&console, &context);
            Ok(())
        }
        None => {
            console.warn("Not logged in");
            match controller.last_error() {
                Some(error) => Err(error.into()),
                None => Ok(()),
            }
        }
    }
}

fn print_session(console: &CliConsole, context: &SessionContext) {
    let profile = &context.profile;
    console.success(&format!("Logged in as {}", profile.name()));
    console.print_header("Profile");
    console.field("ID", &profile.id);
    if let Some(email) = &profile.email {
        console.field("Email", email);
    }
    if let Some(product) = &profile.product {
        console.field("Plan", product);
    }
    console.field("URI", &profile.uri);
    if let Some(url) = &profile.external_urls.spotify {
        console.field("Profile URL", url);
    }
}

/// Print the stored access token for other tools
pub async fn token(config_file: &str) -> EncoreResult<()> {
    let config = load_config(config_file)?;
    let navigator = TerminalNavigator::new(config.redirect_uri.clone(), false);
    let controller = build_controller(&config, Arc::new(navigator))?;

    let bearer = controller.bearer()?;
    println!("{}", bearer.as_str());
    Ok(())
}

/// Forget the stored session
pub async fn logout(config_file: &str) -> EncoreResult<()> {
    let console = CliConsole::new(true);
    let config = load_config(config_file)?;
    let navigator = TerminalNavigator::new(config.redirect_uri.clone(), false);
    let controller = build_controller(&config, Arc::new(navigator))?;

    controller.logout()?;
    console.success("Logged out");
    Ok(())
}

/// Hint shown next to an error
pub fn hint_for(error: &EncoreError) -> Option<&'static str> {
    match error {
        EncoreError::Auth(AuthError::MissingVerifier) => {
            Some("This login was already used or never started here; run `encore login` again.")
        }
        EncoreError::Auth(AuthError::NoSession) => Some("Run `encore login` first."),
        EncoreError::Auth(AuthError::AuthorizationDenied(_)) => {
            Some("Access was not granted; run `encore login` to try again.")
        }
        EncoreError::Auth(AuthError::Profile(_)) => {
            Some("The stored token was not accepted; run `encore logout` and log in again.")
        }
        EncoreError::Config { .. } => Some("Run `encore config init` to create a config file."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints() {
        assert!(hint_for(&AuthError::MissingVerifier.into()).is_some());
        assert!(hint_for(&EncoreError::config("x")).is_some());
        assert!(hint_for(&EncoreError::json("x")).is_none());
    }
}
