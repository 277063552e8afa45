//! Configuration file parser for ~/.config/tend/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use crate::util::{validate_base_url, UrlError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Environment variable holding the owning user id.
pub const USER_ID_ENV: &str = "TEND_USER_ID";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid api_base_url: {0}")]
    BaseUrl(#[from] UrlError),

    #[error("Invalid user id in {source_name}: {value:?}")]
    UserId {
        source_name: &'static str,
        value: String,
    },
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the todos REST API.
    pub api_base_url: String,

    /// Owning user. Without one the session stays unconfigured.
    pub user_id: Option<u32>,

    /// How long a notification stays visible, in seconds.
    pub notification_secs: u64,

    /// Per-request timeout for the remote store, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://mate.academy/students-api".to_string(),
            user_id: None,
            notification_secs: 3,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 4] = [
        "api_base_url",
        "user_id",
        "notification_secs",
        "request_timeout_secs",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), base_url = %config.api_base_url, "Loaded configuration");
        Ok(config)
    }

    /// The validated API base URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Ok(validate_base_url(&self.api_base_url)?)
    }

    /// Notification lifetime; at least one second.
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Resolve the owning user id.
    ///
    /// Precedence: command line, then `TEND_USER_ID`, then the config file.
    /// `Ok(None)` means no source supplied one.
    pub fn resolve_user_id(
        &self,
        cli: Option<u32>,
        env: Option<&str>,
    ) -> Result<Option<u32>, ConfigError> {
        if cli.is_some() {
            return Ok(cli);
        }
        if let Some(raw) = env.map(str::trim).filter(|s| !s.is_empty()) {
            return parse_user_id(raw, USER_ID_ENV).map(Some);
        }
        match self.user_id {
            Some(0) => Err(ConfigError::UserId {
                source_name: "config file",
                value: "0".to_string(),
            }),
            other => Ok(other),
        }
    }
}

fn parse_user_id(raw: &str, source_name: &'static str) -> Result<u32, ConfigError> {
    match raw.parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ConfigError::UserId {
            source_name,
            value: raw.to_string(),
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
