//! Configuration loading and management
//!
//! Handles parsing of the user-level `tabq.toml` file. Everything has a
//! default; the file only exists when the user overrides something.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::store::STORE_FILE;

/// Config file name inside the config directory.
pub const CONFIG_FILE: &str = "tabq.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Browser endpoint configuration
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Task store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// Browser debugging endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Base URL of the browser's remote debugging endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Connect timeout for endpoint requests, in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Overall request timeout, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:9222".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    1500
}

fn default_request_timeout_ms() -> u64 {
    4000
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Task store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store file path; defaults to `tasks.json` in the user data directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Timeout when waiting for the store lock, in milliseconds
    #[serde(default = "default_store_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_store_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            lock_timeout_ms: default_store_lock_timeout_ms(),
        }
    }
}

/// Check that an endpoint URL is plausible before handing it to the client.
pub fn validate_endpoint(endpoint: &str) -> Result<()> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidConfig(
            "browser.endpoint cannot be empty".to_string(),
        ));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(Error::InvalidConfig(format!(
            "browser.endpoint '{endpoint}' must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the user configuration, or defaults when no file exists.
    ///
    /// A file that exists but fails to parse or validate is an error, not
    /// a silent fallback.
    pub fn load_or_default() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        validate_endpoint(&self.browser.endpoint)?;
        if self.browser.connect_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "browser.connect_timeout_ms must be > 0".to_string(),
            ));
        }
        if self.browser.request_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "browser.request_timeout_ms must be > 0".to_string(),
            ));
        }
        if self.store.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "store.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Path to the user config file, when a home directory can be determined.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tabq").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Default store file path in the user data directory.
pub fn default_store_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tabq").map(|dirs| dirs.data_dir().join(STORE_FILE))
}
