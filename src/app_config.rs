//! Application configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (prefixed with PTV_)
//! 2. Config file (config.toml)
//! 3. Default values
//!
//! The database URL is not part of this file; it comes from `DATABASE_URL`.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Global application configuration
pub static APP_CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| {
    RwLock::new(AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    }))
});

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum JSON request body in KiB
    pub json_limit_kb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            json_limit_kb: 1024,
        }
    }
}

/// Publishing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishingConfig {
    /// Seconds between scheduled publish/archive sweeps
    pub scheduler_interval_seconds: u64,
    /// Language codes content may be written in
    pub languages: Vec<String>,
}

impl Default for PublishingConfig {
    fn default() -> Self {
        Self {
            scheduler_interval_seconds: 60,
            languages: ["fi", "sv", "en", "se", "smn", "sms"]
                .iter()
                .map(|l| l.to_string())
                .collect(),
        }
    }
}

impl PublishingConfig {
    pub fn is_supported_language(&self, code: &str) -> bool {
        self.languages.iter().any(|l| l == code)
    }
}

/// Postal code coordinate service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatesConfig {
    pub service_url: String,
    /// Postal codes per request and per transaction
    pub batch_size: u64,
    pub timeout_seconds: u64,
    /// Request codes one at a time instead of in batches
    pub one_by_one: bool,
}

impl Default for CoordinatesConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8081/postal-codes".to_string(),
            batch_size: 100,
            timeout_seconds: 30,
            one_by_one: false,
        }
    }
}

/// Opening hours limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningHoursConfig {
    pub max_intervals_per_day: usize,
}

impl Default for OpeningHoursConfig {
    fn default() -> Self {
        Self {
            max_intervals_per_day: 3,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub publishing: PublishingConfig,
    pub coordinates: CoordinatesConfig,
    pub opening_hours: OpeningHoursConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        use config::FileFormat;

        let config = Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // e.g. PTV_SERVER_PORT, PTV_COORDINATES_BATCH_SIZE
            .add_source(
                Environment::with_prefix("PTV")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reload configuration from file
    pub fn reload() -> Result<(), ConfigError> {
        let new_config = Self::load()?;
        if let Ok(mut config) = APP_CONFIG.write() {
            *config = new_config;
            log::info!("Configuration reloaded");
        }
        Ok(())
    }
}

/// Initialize application configuration
///
/// Triggers the lazy load and logs the result. Call early in startup.
pub fn init() {
    let config = get_config();
    log::info!(
        "Configuration loaded: server = {}:{}, languages = {:?}",
        config.server.host,
        config.server.port,
        config.publishing.languages
    );
}

/// Get the current application configuration
pub fn get_config() -> AppConfig {
    APP_CONFIG.read().map(|c| c.clone()).unwrap_or_default()
}

pub fn server() -> ServerConfig {
    get_config().server
}

pub fn publishing() -> PublishingConfig {
    get_config().publishing
}

pub fn coordinates() -> CoordinatesConfig {
    get_config().coordinates
}

pub fn opening_hours() -> OpeningHoursConfig {
    get_config().opening_hours
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.publishing.scheduler_interval_seconds, 60);
        assert_eq!(config.coordinates.batch_size, 100);
        assert!(!config.coordinates.one_by_one);
        assert_eq!(config.opening_hours.max_intervals_per_day, 3);
    }

    #[test]
    fn test_default_languages() {
        let config = AppConfig::default();
        assert!(config.publishing.is_supported_language("fi"));
        assert!(config.publishing.is_supported_language("smn"));
        assert!(!config.publishing.is_supported_language("de"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
port = 9090

[publishing]
languages = ["fi", "sv"]

[coordinates]
service_url = "https://coords.example.com/wfs"
batch_size = 25
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(temp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.publishing.languages, vec!["fi", "sv"]);
        assert_eq!(config.coordinates.service_url, "https://coords.example.com/wfs");
        assert_eq!(config.coordinates.batch_size, 25);
        // Defaults should still apply for unspecified values
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.coordinates.timeout_seconds, 30);
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = AppConfig::load_from_path("/nonexistent/config.toml").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.publishing.languages.len(), 6);
    }
}
