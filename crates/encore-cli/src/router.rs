//! Command routing logic for CLI

use crate::args::{Cli, Commands, ConfigAction};
use crate::commands;
use encore_core::error::EncoreResult;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> EncoreResult<()> {
    let config_file = cli.config_file.as_str();

    match cli.command {
        Commands::Login { no_browser } => commands::auth::login(config_file, no_browser).await,
        Commands::Callback { url } => commands::auth::callback(config_file, &url).await,
        Commands::Status => commands::auth::status(config_file).await,
        Commands::Token => commands::auth::token(config_file).await,
        Commands::Logout => commands::auth::logout(config_file).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(config_file).await,
            ConfigAction::Validate => commands::config::validate(config_file).await,
            ConfigAction::Init { force } => commands::config::init(config_file, force).await,
        },
    }
}
