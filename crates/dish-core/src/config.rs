//! Environment Configuration Loader
//!
//! Loads environment variables from `/etc/dish-dashboard/environment` (or a
//! local `.env` during development) and resolves the dashboard endpoints.
//!
//! ## Usage
//!
//! Call `load_environment()` early in main() before reading the config:
//!
//! ```rust,no_run
//! use dish_core::config::{load_environment, DashboardConfig};
//!
//! load_environment();
//! let config = DashboardConfig::from_env().unwrap();
//! assert!(config.service_url.starts_with("http"));
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// REST endpoint of the dish service
pub const DEFAULT_SERVICE_URL: &str = "https://dish-manager-service.onrender.com";

/// Push-channel endpoint of the dish service
pub const DEFAULT_PUSH_URL: &str = "wss://dish-manager-service.onrender.com";

/// Fixed delay between a push-channel close and the next connection attempt
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Default timeout for REST requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment files to check (in order of priority)
pub const ENV_FILE_PATHS: &[&str] = &["/etc/dish-dashboard/environment", ".env"];

pub const ENV_SERVICE_URL: &str = "DISH_SERVICE_URL";
pub const ENV_PUSH_URL: &str = "DISH_PUSH_URL";
pub const ENV_RECONNECT_SECS: &str = "DISH_RECONNECT_SECS";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "DISH_HTTP_TIMEOUT_SECS";

/// Resolved dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL for `/dishes/...` requests
    pub service_url: String,
    /// WebSocket URL of the push channel
    pub push_url: String,
    /// Delay before each reconnection attempt
    pub reconnect_delay: Duration,
    /// Timeout applied to every REST request
    pub http_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            push_url: DEFAULT_PUSH_URL.to_string(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl DashboardConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(get_config_opt)
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_SERVICE_URL) {
            config.service_url = url;
        }
        if let Some(url) = lookup(ENV_PUSH_URL) {
            config.push_url = url;
        }
        if let Some(secs) = lookup(ENV_RECONNECT_SECS) {
            config.reconnect_delay = parse_secs(ENV_RECONNECT_SECS, &secs)?;
        }
        if let Some(secs) = lookup(ENV_HTTP_TIMEOUT_SECS) {
            config.http_timeout = parse_secs(ENV_HTTP_TIMEOUT_SECS, &secs)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that both endpoints use a scheme the adapters can speak
    pub fn validate(&self) -> Result<()> {
        if !(self.service_url.starts_with("http://") || self.service_url.starts_with("https://")) {
            return Err(Error::config(format!(
                "service URL must be http(s): {}",
                self.service_url
            )));
        }
        if !(self.push_url.starts_with("ws://") || self.push_url.starts_with("wss://")) {
            return Err(Error::config(format!(
                "push URL must be ws(s): {}",
                self.push_url
            )));
        }
        Ok(())
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| Error::config(format!("{} must be a whole number of seconds, got {:?}", key, value)))
}

/// Load environment variables from the first environment file found.
///
/// This function:
/// 1. Honors `DISH_ENV_FILE` if set
/// 2. Checks `/etc/dish-dashboard/environment`, then `.env`
/// 3. Does NOT override existing environment variables
///
/// Returns the path that was loaded, or None if no file was found.
pub fn load_environment() -> Option<String> {
    if let Ok(custom_path) = std::env::var("DISH_ENV_FILE") {
        if let Some(path) = try_load_env_file(&custom_path) {
            return Some(path);
        }
    }

    for path in ENV_FILE_PATHS {
        if let Some(loaded_path) = try_load_env_file(path) {
            return Some(loaded_path);
        }
    }

    debug!("No environment file found, using existing environment");
    None
}

fn try_load_env_file(path: &str) -> Option<String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return None;
    }

    match fs::read_to_string(path_obj) {
        Ok(content) => {
            let mut loaded_count = 0;
            let mut skipped_count = 0;

            for line in content.lines() {
                let line = line.trim();

                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                if let Some((key, value)) = parse_env_line(line) {
                    if std::env::var(&key).is_err() {
                        std::env::set_var(&key, &value);
                        loaded_count += 1;
                        debug!("Loaded: {}={}", key, value);
                    } else {
                        skipped_count += 1;
                        debug!("Skipped (already set): {}", key);
                    }
                }
            }

            info!(
                "Loaded {} environment variables from {} ({} skipped - already set)",
                loaded_count, path, skipped_count
            );

            Some(path.to_string())
        }
        Err(e) => {
            warn!("Failed to read environment file {}: {}", path, e);
            None
        }
    }
}

/// Parse a single `KEY=VALUE` line, stripping surrounding quotes.
fn parse_env_line(line: &str) -> Option<(String, String)> {
    let mut parts = line.splitn(2, '=');
    let key = parts.next()?.trim();
    let value = parts.next()?.trim();

    if key.is_empty() {
        return None;
    }

    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);

    Some((key.to_string(), value.to_string()))
}

/// Get an optional configuration value; empty values count as unset.
pub fn get_config_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
