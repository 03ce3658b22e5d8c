//! Configuration Module
//!
//! Handles loading client configuration from environment variables.

use std::env;

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TIMEOUT_SECS};

/// Default host serving the REST endpoint.
pub const DEFAULT_API_HOST: &str = "api.flickr.com";

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Flickr API key
    pub api_key: Option<String>,
    /// Flickr API secret
    pub api_secret: Option<String>,
    /// Host the REST calls are sent to
    pub api_host: String,
    /// Whether REST responses are cached
    pub cache_enabled: bool,
    /// Lifetime in seconds of a cached response
    pub cache_timeout: u64,
    /// Soft capacity of the response cache
    pub cache_max_entries: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `FLICKR_API_KEY` - API key (default: unset)
    /// - `FLICKR_API_SECRET` - API secret (default: unset)
    /// - `FLICKR_API_HOST` - REST host (default: api.flickr.com)
    /// - `FLICKR_CACHE_ENABLED` - `1`/`true` turns the cache on (default: off)
    /// - `FLICKR_CACHE_TIMEOUT` - Cache entry lifetime in seconds (default: 300)
    /// - `FLICKR_CACHE_MAX_ENTRIES` - Cache capacity (default: 200)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("FLICKR_API_KEY").ok().filter(|v| !v.is_empty()),
            api_secret: env::var("FLICKR_API_SECRET").ok().filter(|v| !v.is_empty()),
            api_host: env::var("FLICKR_API_HOST").unwrap_or(defaults.api_host),
            cache_enabled: env::var("FLICKR_CACHE_ENABLED")
                .ok()
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.cache_enabled),
            cache_timeout: env::var("FLICKR_CACHE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_timeout),
            cache_max_entries: env::var("FLICKR_CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_max_entries),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            api_host: DEFAULT_API_HOST.to_string(),
            cache_enabled: false,
            cache_timeout: DEFAULT_TIMEOUT_SECS,
            cache_max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
