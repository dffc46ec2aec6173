//! Client configuration
//!
//! Reads `<config dir>/donation-admin/config.toml`. A missing file
//! means defaults; command-line flags override whatever the file says.

use donation_client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, FileSessionStore};
use donation_core::{AdminError, AdminResult};
use donation_ui::PageSize;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Client configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend URL (e.g. "http://127.0.0.1:8080").
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Rows per page on the user list (5, 10 or 20).
    pub user_page_size: usize,

    /// Rows per page on the donation list (5, 10 or 20).
    pub donation_page_size: usize,

    /// Where the login is kept; defaults next to this file.
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_page_size: 10,
            donation_page_size: 5,
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("donation-admin")
            .join("config.toml")
    }

    /// Load config from disk, or return defaults if the file doesn't exist.
    pub fn load(path: &Path) -> AdminResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| AdminError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: ClientConfig = toml::from_str(&content)
            .map_err(|e| AdminError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AdminResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(AdminError::InvalidConfig(format!(
                "base_url must start with http:// or https:// (got '{}')",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(AdminError::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.user_page_size()?;
        self.donation_page_size()?;
        Ok(())
    }

    pub fn user_page_size(&self) -> AdminResult<PageSize> {
        page_size("user_page_size", self.user_page_size)
    }

    pub fn donation_page_size(&self) -> AdminResult<PageSize> {
        page_size("donation_page_size", self.donation_page_size)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Session file in effect
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(FileSessionStore::default_path)
    }
}

fn page_size(key: &str, value: usize) -> AdminResult<PageSize> {
    PageSize::try_from(value)
        .map_err(|_| AdminError::InvalidConfig(format!("{} must be 5, 10 or 20 (got {})", key, value)))
}
