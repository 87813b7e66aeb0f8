//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `BILLED_*` environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::session::{FileStorage, SESSION_KEY};
use crate::store::HttpStoreConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which remote store implementation to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process store seeded with sample bills
    #[default]
    Memory,
    /// REST backend
    Http,
}

impl StoreBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(StoreBackend::Memory),
            "http" => Some(StoreBackend::Http),
            _ => None,
        }
    }
}

/// Remote store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    pub token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:5678".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            token: None,
        }
    }
}

impl StoreConfig {
    pub fn http(&self) -> HttpStoreConfig {
        HttpStoreConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            token: self.token.clone(),
        }
    }
}

/// Persisted session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// JSON file holding the key-value session storage
    pub storage_path: Option<String>,

    #[serde(default = "default_session_key")]
    pub key: String,
}

fn default_session_key() -> String {
    SESSION_KEY.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            key: default_session_key(),
        }
    }
}

impl SessionConfig {
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(FileStorage::default_path)
    }
}

/// Application shell configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Path navigated to on start; the session's landing page when unset
    pub initial_path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("billed").join("config.toml")),
            Some(PathBuf::from("./billed.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply `BILLED_*` overrides read through `lookup`
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Store overrides
        if let Some(backend) = lookup("BILLED_STORE_BACKEND") {
            match StoreBackend::parse(&backend) {
                Some(b) => self.store.backend = b,
                None => tracing::warn!(backend = %backend, "Ignoring unknown store backend"),
            }
        }
        if let Some(url) = lookup("BILLED_STORE_URL") {
            self.store.base_url = url;
        }
        if let Some(timeout) = lookup("BILLED_STORE_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.store.timeout_secs = t;
            }
        }
        if let Some(token) = lookup("BILLED_STORE_TOKEN") {
            self.store.token = Some(token);
        }

        // Session overrides
        if let Some(path) = lookup("BILLED_SESSION_PATH") {
            self.session.storage_path = Some(path);
        }

        // App overrides
        if let Some(path) = lookup("BILLED_INITIAL_PATH") {
            self.app.initial_path = Some(path);
        }

        // Logging overrides
        if let Some(level) = lookup("BILLED_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("BILLED_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r##"# Billed Configuration
#
# Environment variables override these settings:
# - BILLED_STORE_BACKEND
# - BILLED_STORE_URL
# - BILLED_STORE_TIMEOUT
# - BILLED_STORE_TOKEN
# - BILLED_SESSION_PATH
# - BILLED_INITIAL_PATH
# - BILLED_LOG_LEVEL
# - BILLED_LOG_FORMAT

[store]
# Remote store: memory (sample bills) or http (REST backend)
backend = "memory"

# REST backend URL
base_url = "http://localhost:5678"

# Request timeout in seconds
timeout_secs = 30

# Bearer token sent with every request
# token = ""

[session]
# JSON file holding the persisted session
# storage_path = "~/.local/share/billed/storage.json"

# Key of the session entry
key = "user"

[app]
# Path to open on start, defaults to the session's landing page
# initial_path = "#employee/bills"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"##
    .to_string()
}
