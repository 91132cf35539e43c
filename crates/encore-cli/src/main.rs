//! Encore CLI application
//!
//! Terminal shell around the Encore session core. A login spans two
//! invocations: `encore login` stores a PKCE verifier and hands the user to
//! the provider, and `encore callback <url>` redeems the code the provider
//! redirected back with.

mod app;
mod args;
mod commands;
mod console;
mod logging;
mod navigator;
mod router;

use args::Cli;
use clap::Parser;
use console::CliConsole;
use encore_core::config::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logging settings come from the same layers as everything else, but an
    // invalid config must not prevent logging from starting
    let logging = ConfigLoader::new()
        .with_defaults()
        .with_file(&cli.config_file)
        .with_env()
        .load_unvalidated()
        .map(|config| config.logging)
        .unwrap_or_default();
    logging::init(&logging, cli.verbose);

    if let Err(error) = router::route(cli).await {
        let console = CliConsole::new(true);
        console.error(&error.to_string());
        if let Some(hint) = commands::auth::hint_for(&error) {
            console.info(hint);
        }
        tracing::debug!(code = error.error_code(), "command failed");
        std::process::exit(1);
    }
}
