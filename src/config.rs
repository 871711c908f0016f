//! Server and client configuration parsed from environment variables.

use crate::display::Locale;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

// =============================================================================
// SERVER
// =============================================================================

/// Backing store for the moments server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub storage: Storage,
}

impl ServerConfig {
    /// Build server config from environment variables.
    ///
    /// - `MOMENTS_STORAGE`: `postgres` (default) or `memory`
    /// - `DATABASE_URL`: required when storage is `postgres`
    /// - `PORT`: default 3000
    ///
    /// # Errors
    ///
    /// Returns an error if a value is malformed or `DATABASE_URL` is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            Err(_) => DEFAULT_PORT,
        };

        let storage = match std::env::var("MOMENTS_STORAGE").ok().as_deref().unwrap_or("postgres") {
            "postgres" => {
                let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
                Storage::Postgres { database_url }
            }
            "memory" => Storage::Memory,
            other => return Err(ConfigError::Invalid { var: "MOMENTS_STORAGE", value: other.to_owned() }),
        };

        Ok(Self { port, storage })
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl ClientTimeouts {
    /// Read `MOMENTS_REQUEST_TIMEOUT_SECS` and `MOMENTS_CONNECT_TIMEOUT_SECS`,
    /// falling back to the defaults when unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            request_secs: env_parse_u64("MOMENTS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("MOMENTS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl Default for ClientTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Collection resource URL, without a trailing slash.
    pub api_url: String,
    pub timeouts: ClientTimeouts,
    pub locale: Locale,
}

impl ClientConfig {
    /// Build client config from environment variables.
    ///
    /// - `MOMENTS_API_URL`: default `http://127.0.0.1:3000`
    /// - `MOMENTS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `MOMENTS_CONNECT_TIMEOUT_SECS`: default 10
    /// - `MOMENTS_LOCALE`: `ru` (default) or `en`
    ///
    /// # Errors
    ///
    /// Returns an error if the locale is unknown.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var("MOMENTS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        let timeouts = ClientTimeouts::from_env();
        let locale = parse_locale(std::env::var("MOMENTS_LOCALE").ok().as_deref())?;
        Ok(Self::new(api_url, timeouts, locale))
    }

    #[must_use]
    pub fn new(api_url: impl Into<String>, timeouts: ClientTimeouts, locale: Locale) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_owned();
        Self { api_url, timeouts, locale }
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

/// Parse a `MOMENTS_LOCALE` value; `None` means the default.
///
/// # Errors
///
/// Returns an error for anything but `ru` or `en`.
pub fn parse_locale(raw: Option<&str>) -> Result<Locale, ConfigError> {
    match raw.unwrap_or("ru") {
        "ru" => Ok(Locale::Ru),
        "en" => Ok(Locale::En),
        other => Err(ConfigError::Invalid { var: "MOMENTS_LOCALE", value: other.to_owned() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
