//! Terminal stand-in for browser navigation

use colored::*;
use encore_core::Navigator;
use tracing::{debug, warn};

/// Navigator for a terminal session
///
/// `assign` opens the system browser (or only prints the URL); `replace`
/// has no visible address to rewrite.
pub struct TerminalNavigator {
    current: String,
    open_browser: bool,
}

impl TerminalNavigator {
    pub fn new(current: impl Into<String>, open_browser: bool) -> Self {
        Self {
            current: current.into(),
            open_browser,
        }
    }
}

impl Navigator for TerminalNavigator {
    fn current_url(&self) -> String {
        self.current.clone()
    }

    fn assign(&self, url: &str) {
        if self.open_browser {
            match open::that(url) {
                Ok(()) => debug!("opened authorization page in browser"),
                Err(e) => warn!(error = %e, "failed to open browser"),
            }
        }

        println!("{}", "Authorization URL:".bold());
        println!("  {}", url.cyan());
    }

    fn replace(&self, url: &str) {
        debug!(%url, "address replaced");
    }
}
