//! Configuration management for RentNest services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml)
//! - Default values

use crate::errors::{AppError, Result};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Listing feed configuration
    #[serde(default)]
    pub feed: FeedConfig,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Listing submission configuration
    #[serde(default)]
    pub submission: SubmissionConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Largest accepted request body (photos included)
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Listings per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Maximum number of slots in the page selector
    #[serde(default = "default_max_page_slots")]
    pub max_page_slots: usize,

    /// First id handed to agent sample listings
    #[serde(default = "default_supplemental_id_offset")]
    pub supplemental_id_offset: u32,

    /// Lowest synthetic view count (inclusive)
    #[serde(default = "default_views_min")]
    pub views_min: u32,

    /// Highest synthetic view count (inclusive)
    #[serde(default = "default_views_max")]
    pub views_max: u32,

    /// Seed for synthetic view counts; random when unset
    pub views_seed: Option<u64>,

    /// Photo used when a sample listing has none
    #[serde(default = "default_placeholder_photo")]
    pub placeholder_photo: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Artificial latency of login and registration
    #[serde(default = "default_simulated_latency")]
    pub simulated_latency_ms: u64,

    /// File holding the persisted session flags; in-memory when unset
    pub store_path: Option<PathBuf>,
}

impl SessionConfig {
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmissionConfig {
    /// Artificial latency of a listing submission
    #[serde(default = "default_simulated_latency")]
    pub simulated_latency_ms: u64,

    /// Photos required per listing
    #[serde(default = "default_min_photos")]
    pub min_photos: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 30 }
fn default_body_limit() -> usize { 25 * 1024 * 1024 }
fn default_page_size() -> usize { 6 }
fn default_max_page_slots() -> usize { 5 }
fn default_supplemental_id_offset() -> u32 { 100 }
fn default_views_min() -> u32 { 50 }
fn default_views_max() -> u32 { 249 }
fn default_placeholder_photo() -> String {
    "https://images.unsplash.com/photo-1560518883-ce09059eeffa?auto=format&fit=crop&w=1773&q=80"
        .to_string()
}
fn default_simulated_latency() -> u64 { 1000 }
fn default_min_photos() -> usize { 5 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_service_name() -> String { "rentnest".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_page_slots: default_max_page_slots(),
            supplemental_id_offset: default_supplemental_id_offset(),
            views_min: default_views_min(),
            views_max: default_views_max(),
            views_seed: None,
            placeholder_photo: default_placeholder_photo(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: default_simulated_latency(),
            store_path: None,
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: default_simulated_latency(),
            min_photos: default_min_photos(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            service_name: default_service_name(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> std::result::Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__FEED__PAGE_SIZE=6
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> std::result::Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings the feed and form cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.feed.page_size == 0 {
            return Err(AppError::Configuration {
                message: "feed.page_size must be at least 1".to_string(),
            });
        }
        if self.feed.max_page_slots < 5 {
            return Err(AppError::Configuration {
                message: "feed.max_page_slots must be at least 5".to_string(),
            });
        }
        if self.feed.views_min > self.feed.views_max {
            return Err(AppError::Configuration {
                message: format!(
                    "feed.views_min ({}) exceeds feed.views_max ({})",
                    self.feed.views_min, self.feed.views_max
                ),
            });
        }
        if self.submission.min_photos == 0 {
            return Err(AppError::Configuration {
                message: "submission.min_photos must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Latency applied to simulated listing submission
    pub fn submission_latency(&self) -> Duration {
        Duration::from_millis(self.submission.simulated_latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.feed.page_size, 6);
        assert_eq!(config.feed.supplemental_id_offset, 100);
        assert_eq!(config.submission.min_photos, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_latency_durations() {
        let config = AppConfig::default();
        assert_eq!(config.session.simulated_latency(), Duration::from_secs(1));
        assert_eq!(config.submission_latency(), Duration::from_secs(1));
    }

    #[test]
    fn test_rejects_inverted_view_range() {
        let mut config = AppConfig::default();
        config.feed.views_min = 300;
        assert!(matches!(config.validate(), Err(AppError::Configuration { .. })));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let mut config = AppConfig::default();
        config.feed.page_size = 0;
        assert!(config.validate().is_err());
    }
}
