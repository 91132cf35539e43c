//! Default values for client configuration

/// Provider accounts service (authorization + token endpoints)
pub const DEFAULT_ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";

/// Provider Web API
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com";

/// Redirect target used when none is configured
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:5173/callback";

/// Scopes requested when none are configured
pub const DEFAULT_SCOPES: &[&str] = &["user-read-private", "user-read-email", "user-top-read"];

/// Verifier length in characters (the provider maximum)
pub const DEFAULT_VERIFIER_LENGTH: usize = 128;

/// Timeout for token and API requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Refresh tokens this long before they expire (60 seconds)
pub const DEFAULT_REFRESH_LEEWAY_SECS: u64 = 60;

/// Upper bound on the refresh leeway (one day)
pub const MAX_REFRESH_LEEWAY_SECS: u64 = 24 * 60 * 60;

/// Default configuration file name used across all CLI commands.
pub const DEFAULT_CONFIG_FILE: &str = "encore_config.json";
