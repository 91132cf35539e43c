//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use encore_core::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Encore - music service client")]
#[command(
    long_about = r#"Encore - music service client

USAGE:
  encore login                   # Authorize in the browser
  encore callback "<url>"        # Finish login with the redirected URL
  encore status                  # Show the current session
  encore token                   # Print the access token
  encore logout                  # Forget the session

For detailed help: encore --help"#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE, env = "ENCORE_CONFIG")]
    pub config_file: String,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a login: store a verifier and open the authorization page
    Login {
        /// Print the authorization URL instead of opening a browser
        #[arg(long)]
        no_browser: bool,
    },

    /// Complete a login with the URL the provider redirected to
    Callback {
        /// Full redirect URL, including its `code` or `error` parameter
        url: String,
    },

    /// Resolve the stored session and show the signed-in user
    Status,

    /// Print the stored access token
    Token,

    /// Clear the stored session
    Logout,

    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Display current configuration settings
    Show,

    /// Validate configuration file for errors
    Validate,

    /// Create a new configuration file with defaults
    Init {
        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}
