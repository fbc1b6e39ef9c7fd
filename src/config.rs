//! Configuration management for the `WeatherWise` dashboard
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherWiseError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "WEATHERWISE_CONFIG";

/// Root configuration structure for the `WeatherWise` dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherWiseConfig {
    /// Web server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Upper bound for handling a single request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Upper bound for loading a forecast inside a page or API request,
    /// retries included. Must stay below `request_timeout_seconds`.
    #[serde(default = "default_forecast_deadline")]
    pub forecast_deadline_seconds: u64,
    /// How often the detail page reloads itself, in seconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    /// Directory served under `/assets`
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the forecast API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_weather_max_retries")]
    pub max_retries: u32,
    /// First backoff delay in milliseconds, doubled on every retry
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache TTL in hours
    #[serde(default = "default_cache_ttl")]
    pub ttl_hours: u32,
    /// Cache directory location
    #[serde(default = "default_cache_location")]
    pub location: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log output destination (console or file)
    #[serde(default = "default_log_output")]
    pub output: String,
    /// Log file path
    #[serde(default = "default_log_file_path")]
    pub file_path: String,
}

// Default value functions
fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8050
}

fn default_request_timeout() -> u64 {
    30
}

fn default_forecast_deadline() -> u64 {
    20
}

fn default_refresh_interval() -> u64 {
    24 * 60 * 60
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_weather_max_retries() -> u32 {
    5
}

fn default_backoff_base_ms() -> u64 {
    200
}

fn default_cache_ttl() -> u32 {
    24
}

fn default_cache_location() -> String {
    ".cache".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_output() -> String {
    "file".to_string()
}

fn default_log_file_path() -> String {
    "api_pull.log".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            request_timeout_seconds: default_request_timeout(),
            forecast_deadline_seconds: default_forecast_deadline(),
            refresh_interval_seconds: default_refresh_interval(),
            assets_dir: default_assets_dir(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            max_retries: default_weather_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_cache_ttl(),
            location: default_cache_location(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            output: default_log_output(),
            file_path: default_log_file_path(),
        }
    }
}

impl ServerConfig {
    /// Socket address string the server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    #[must_use]
    pub fn forecast_deadline(&self) -> Duration {
        Duration::from_secs(self.forecast_deadline_seconds)
    }
}

impl WeatherConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.ttl_hours) * 60 * 60)
    }
}

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const LOG_FORMATS: [&str; 2] = ["pretty", "json"];
const LOG_OUTPUTS: [&str; 2] = ["console", "file"];

fn one_of(setting: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(WeatherWiseError::config(format!(
        "Invalid {setting} '{value}'. Must be one of: {}",
        allowed.join(", ")
    ))
    .into())
}

fn ensure(ok: bool, message: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(WeatherWiseError::config(message).into())
    }
}

impl WeatherWiseConfig {
    /// Load configuration from `config_path`, else the file named by
    /// `WEATHERWISE_CONFIG`, else `config.toml`, plus environment overrides.
    /// A missing file is not an error; every setting has a default.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("config.toml"));

        let settings = Config::builder()
            .add_source(
                File::from(config_file.as_path())
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            // e.g. WEATHERWISE_SERVER__PORT=9000
            .add_source(
                Environment::with_prefix("WEATHERWISE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", config_file.display()))?;

        let mut config: WeatherWiseConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;
        Ok(config)
    }

    /// Empty strings and zero durations fall back to their defaults
    pub fn apply_defaults(&mut self) {
        let fill = |value: &mut String, default: fn() -> String| {
            if value.trim().is_empty() {
                *value = default();
            }
        };
        fill(&mut self.server.host, default_server_host);
        fill(&mut self.server.assets_dir, default_assets_dir);
        fill(&mut self.weather.base_url, default_weather_base_url);
        fill(&mut self.cache.location, default_cache_location);
        fill(&mut self.logging.level, default_log_level);
        fill(&mut self.logging.format, default_log_format);
        fill(&mut self.logging.output, default_log_output);
        fill(&mut self.logging.file_path, default_log_file_path);

        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.cache.ttl_hours == 0 {
            self.cache.ttl_hours = default_cache_ttl();
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure(self.server.port != 0, "Server port must not be 0")?;
        ensure(
            self.server.request_timeout_seconds > 0,
            "Request timeout must be at least 1 second",
        )?;
        ensure(
            self.server.forecast_deadline_seconds > 0,
            "Forecast deadline must be at least 1 second",
        )?;
        // The page must be able to render its error banner before the
        // request itself is cut off
        ensure(
            self.server.forecast_deadline_seconds < self.server.request_timeout_seconds,
            "Forecast deadline must be shorter than the request timeout",
        )?;
        ensure(
            self.server.refresh_interval_seconds > 0,
            "Refresh interval must be at least 1 second",
        )?;
        ensure(
            self.weather.timeout_seconds <= 300,
            "Weather API timeout cannot exceed 300 seconds",
        )?;
        ensure(
            self.weather.max_retries <= 10,
            "Weather API max retries cannot exceed 10",
        )?;
        ensure(
            self.weather.backoff_base_ms <= 10_000,
            "Retry backoff cannot exceed 10000 ms",
        )?;
        ensure(
            self.cache.ttl_hours <= 168,
            "Cache TTL cannot exceed 168 hours (1 week)",
        )?;
        ensure(
            self.weather.base_url.starts_with("http://")
                || self.weather.base_url.starts_with("https://"),
            "Weather API base URL must be a valid HTTP or HTTPS URL",
        )?;

        one_of("log level", &self.logging.level, &LOG_LEVELS)?;
        one_of("log format", &self.logging.format, &LOG_FORMATS)?;
        one_of("log output", &self.logging.output, &LOG_OUTPUTS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = WeatherWiseConfig::default();
        assert_eq!(config.server.port, 8050);
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.weather.max_retries, 5);
        assert_eq!(config.weather.backoff_base_ms, 200);
        assert_eq!(config.cache.ttl_hours, 24);
        assert_eq!(config.cache.ttl(), Duration::from_secs(86_400));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.output, "file");
        assert_eq!(config.logging.file_path, "api_pull.log");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_forecast_deadline_must_fit_request_timeout() {
        let mut config = WeatherWiseConfig::default();
        assert!(config.server.forecast_deadline() < config.server.request_timeout());

        config.server.forecast_deadline_seconds = config.server.request_timeout_seconds;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("shorter than the request timeout"));

        config.server.forecast_deadline_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WeatherWiseConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = WeatherWiseConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = WeatherWiseConfig::default();
        config.cache.ttl_hours = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = WeatherWiseConfig::default();
        config.weather.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = WeatherWiseConfig::default();
        config.cache.ttl_hours = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.cache.ttl_hours, 24);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[cache]\nttl_hours = 12\nlocation = \"/tmp/ww-cache\"\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = WeatherWiseConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.cache.ttl_hours, 12);
        assert_eq!(config.cache.location, "/tmp/ww-cache");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.weather.max_retries, 5);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            WeatherWiseConfig::load_from_path(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.server.port, 8050);
        assert_eq!(config.server.refresh_interval_seconds, 86_400);
    }

    #[test]
    fn test_invalid_log_output() {
        let mut config = WeatherWiseConfig::default();
        config.logging.output = "both".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid log output 'both'"));
    }

    #[test]
    fn test_bind_address() {
        let config = WeatherWiseConfig::default();
        assert_eq!(config.server.bind_address(), "127.0.0.1:8050");
    }
}
