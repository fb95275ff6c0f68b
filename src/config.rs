//! Configuration management for the people lookup server.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is loaded if present; stdout is never written to, because
//! MCP uses it for communication.

use crate::domain::CountryRules;
use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::time::Duration;

/// Hosts tried in order: the local service, then its loopback alias.
pub const DEFAULT_HOSTS: [&str; 2] = ["http://localhost:8000", "http://127.0.0.1:8000"];

/// Largest accepted per-host timeout (two minutes).
pub const MAX_TIMEOUT_MS: u64 = 120_000;

/// Largest accepted cache TTL (one week).
pub const MAX_CACHE_TTL_MINUTES: u64 = 7 * 24 * 60;

/// Configuration for the people lookup server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lookup API base URLs, tried in order
    pub api_hosts: Vec<String>,

    /// Per-host timeout for phone lookups in milliseconds (default: 5000)
    pub phone_timeout_ms: u64,

    /// Per-host timeout for people/address/background searches in milliseconds (default: 10000)
    pub page_timeout_ms: u64,

    /// Country assumed when a phone lookup names none (default: "US")
    pub default_country: String,

    /// Lookup cache TTL in minutes (default: 60)
    pub cache_ttl_minutes: u64,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `LOOKUP_API_HOSTS`: comma-separated base URLs (default: localhost then 127.0.0.1, port 8000)
    /// - `PHONE_LOOKUP_TIMEOUT_MS`: per-host phone timeout (default: 5000)
    /// - `PAGE_SEARCH_TIMEOUT_MS`: per-host page search timeout (default: 10000)
    /// - `DEFAULT_COUNTRY`: ISO-2 code from the country table (default: "US")
    /// - `LOOKUP_CACHE_TTL_MINUTES`: cache TTL (default: 60)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::DotenvError(e.to_string())),
        }

        let api_hosts = match env::var("LOOKUP_API_HOSTS") {
            Ok(raw) => Self::parse_hosts(&raw)?,
            Err(_) => DEFAULT_HOSTS.iter().map(|h| h.to_string()).collect(),
        };

        let phone_timeout_ms = Self::parse_timeout_ms("PHONE_LOOKUP_TIMEOUT_MS", 5000)?;
        let page_timeout_ms = Self::parse_timeout_ms("PAGE_SEARCH_TIMEOUT_MS", 10000)?;

        let default_country = env::var("DEFAULT_COUNTRY")
            .map(|c| c.trim().to_ascii_uppercase())
            .unwrap_or_else(|_| "US".to_string());

        if !CountryRules::standard().contains(&default_country) {
            return Err(ConfigError::InvalidValue {
                var: "DEFAULT_COUNTRY".to_string(),
                reason: format!("Unsupported country code: {}", default_country),
            });
        }

        let cache_ttl_minutes = Self::parse_env_u64("LOOKUP_CACHE_TTL_MINUTES", 60)?;
        if cache_ttl_minutes > MAX_CACHE_TTL_MINUTES {
            return Err(ConfigError::InvalidValue {
                var: "LOOKUP_CACHE_TTL_MINUTES".to_string(),
                reason: format!("Must be at most {} minutes", MAX_CACHE_TTL_MINUTES),
            });
        }
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            api_hosts,
            phone_timeout_ms,
            page_timeout_ms,
            default_country,
            cache_ttl_minutes,
            log_level,
        })
    }

    pub fn phone_timeout(&self) -> Duration {
        Duration::from_millis(self.phone_timeout_ms)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes.saturating_mul(60))
    }

    /// A per-host timeout within `1..=MAX_TIMEOUT_MS`.
    fn parse_timeout_ms(var_name: &str, default: u64) -> ConfigResult<u64> {
        let value = Self::parse_env_u64(var_name, default)?;
        if value == 0 || value > MAX_TIMEOUT_MS {
            return Err(ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be between 1 and {} ms, got: {}", MAX_TIMEOUT_MS, value),
            });
        }
        Ok(value)
    }

    /// Split and validate a comma-separated host list.
    fn parse_hosts(raw: &str) -> ConfigResult<Vec<String>> {
        let hosts: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(|h| h.trim_end_matches('/').to_string())
            .collect();

        if hosts.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "LOOKUP_API_HOSTS".to_string(),
                reason: "At least one host is required".to_string(),
            });
        }

        if let Some(bad) = hosts
            .iter()
            .find(|h| !h.starts_with("http://") && !h.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue {
                var: "LOOKUP_API_HOSTS".to_string(),
                reason: format!("Must start with http:// or https://, got: {}", bad),
            });
        }

        Ok(hosts)
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_hosts: DEFAULT_HOSTS.iter().map(|h| h.to_string()).collect(),
            phone_timeout_ms: 5000,
            page_timeout_ms: 10000,
            default_country: "US".to_string(),
            cache_ttl_minutes: 60,
            log_level: "error".to_string(),
        }
    }
}
