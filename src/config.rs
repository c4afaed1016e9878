//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_IDENTITY_URL: &str = "https://6707d2988e86a8d9e42d1397.mockapi.io/order/v1/users";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const STORE_DIR_NAME: &str = ".orderdesk";
pub const STORE_FILE_NAME: &str = "storage.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid identity URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Where and how to reach the Identity Provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub url: String,
    pub timeouts: Timeouts,
}

impl IdentityConfig {
    /// Build a config for `url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error unless `url` is an absolute `http`/`https` URL.
    pub fn new(url: &str) -> Result<Self, ConfigError> {
        Ok(Self { url: validate_url(url)?, timeouts: Timeouts::default() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub identity: IdentityConfig,
    pub store_path: PathBuf,
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `ORDERDESK_IDENTITY_URL`: Identity Provider endpoint (mock API default)
    /// - `ORDERDESK_STORE_PATH`: token storage file, default `$HOME/.orderdesk/storage.json`
    /// - `ORDERDESK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `ORDERDESK_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the identity URL is not a valid `http(s)` URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("ORDERDESK_IDENTITY_URL").unwrap_or_else(|_| DEFAULT_IDENTITY_URL.to_string());
        let timeouts = Timeouts {
            request_secs: env_parse_u64("ORDERDESK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("ORDERDESK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let store_path = std::env::var_os("ORDERDESK_STORE_PATH")
            .filter(|p| !p.is_empty())
            .map_or_else(default_store_path, PathBuf::from);

        Ok(Self { identity: IdentityConfig { url: validate_url(&url)?, timeouts }, store_path })
    }
}

/// `$HOME/.orderdesk/storage.json`, or relative to the working directory
/// when `HOME` is unset.
#[must_use]
pub fn default_store_path() -> PathBuf {
    let base = std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map_or_else(PathBuf::new, PathBuf::from);
    base.join(STORE_DIR_NAME).join(STORE_FILE_NAME)
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn validate_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidUrl { url: trimmed.to_string(), message: e.to_string() })?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ConfigError::InvalidUrl {
            url: trimmed.to_string(),
            message: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
