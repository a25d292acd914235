//! Web search launching

use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use tracing::debug;

/// Search engine query prefix
const SEARCH_URL: &str = "https://www.google.com/search?q=";

/// Opens URLs for the user
pub trait Browser: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

/// Search results URL for a spoken query
pub fn search_url(query: &str) -> String {
    format!("{}{}", SEARCH_URL, urlencoding::encode(query.trim()))
}

/// Launches the desktop's default browser
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        debug!("Opening {} with {}", url, opener);

        Command::new(opener)
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to run {}", opener))?;
        Ok(())
    }
}
