//! Configuration management
//!
//! Settings are layered: defaults, then an optional JSON file, then
//! `ENCORE_*` environment variables, and validated once at the end.

mod client_config;
mod defaults;
mod loader;
mod logging_config;

pub use client_config::ClientConfig;
pub use defaults::*;
pub use loader::{ConfigLoader, ConfigSource, load_config_from_file};
pub use logging_config::{LogFormat, LoggingConfig};
