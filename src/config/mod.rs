//! Configuration for the web server
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/events-web/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod forms;
mod logging;
mod serialization;

#[cfg(test)]
mod tests;

pub use forms::{FileForms, FormsConfig};
pub use logging::{FileLogging, LogFile, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_API_URL: &str = "http://localhost:1337";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the web server to
    pub bind_addr: SocketAddr,

    /// Base URL of the events backend API
    pub api_url: String,

    /// Timeout for each backend call
    pub request_timeout_secs: u64,

    /// Largest image upload accepted from the browser
    pub max_upload_bytes: usize,

    /// Add `Secure` to the cookies this server sets
    pub secure_cookies: bool,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Edit form behavior
    pub forms: FormsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            secure_cookies: false,
            logging: LoggingConfig::default(),
            forms: FormsConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure; every key optional
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub bind_addr: Option<String>,
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub max_upload_bytes: Option<usize>,
    pub secure_cookies: Option<bool>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,

    /// Optional [forms] section
    pub forms: Option<FileForms>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/events-web/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("events-web").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Read the config file if there is one.
    ///
    /// A file that exists but can't be read or parsed is an error: a broken
    /// config should stop startup, not fall back to defaults silently.
    fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
        let Some(path) = path else {
            return Ok(FileConfig::default());
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Cannot read config file {}", path.display()))
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Result<Self> {
        let file = Self::load_file_config(Self::config_path().as_deref())?;
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file and an environment lookup over the defaults
    pub(crate) fn from_sources<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Bind address: env > file > default
        let bind_raw = env("EVENTS_WEB_BIND")
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw
            .parse()
            .with_context(|| format!("Invalid bind address: {}", bind_raw))?;

        // API URL: env > file > default
        let api_url = env("EVENTS_API_URL")
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        // Timeout: env > file > default
        let request_timeout_secs = env("EVENTS_WEB_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .or(file.request_timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let max_upload_bytes = file.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        // Secure cookies: env ("true"/"1") > file > off
        let secure_cookies = env("EVENTS_WEB_SECURE_COOKIES")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .or(file.secure_cookies)
            .unwrap_or(false);

        let logging = LoggingConfig::from_file(file.logging)?;

        // Forms: env can override the empty-field policy
        let mut forms = FormsConfig::from_file(file.forms);
        if let Some(policy) = env("EVENTS_WEB_EMPTY_FIELDS") {
            forms.empty_fields = crate::form::EmptyFieldPolicy::from_str(&policy);
        }

        Ok(Self {
            bind_addr,
            api_url,
            request_timeout_secs,
            max_upload_bytes,
            secure_cookies,
            logging,
            forms,
        })
    }
}
