//! Configuration management for the City Explorer service
//!
//! Handles loading configuration from a TOML file and environment variables,
//! and validates the settings before the server starts.

use crate::ExplorerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Persistent geocode store
    pub store: StoreConfig,
    /// Geocode cache behaviour
    pub cache: CacheConfig,
    /// Upstream data providers
    pub providers: ProvidersConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// PEM certificate chain; TLS is served only with both paths set
    pub tls_cert_path: Option<PathBuf>,
    /// PEM private key
    pub tls_key_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory of the on-disk geocode store
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Collapse concurrent misses for one query into a single provider call
    pub single_flight: bool,
}

/// Settings for every upstream provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// LocationIQ forward geocoding
    pub geocode: ProviderConfig,
    /// Weatherbit daily forecast
    pub weather: ProviderConfig,
    /// Yelp Fusion business search
    pub yelp: ProviderConfig,
    /// Hiking Project trail search
    pub trails: ProviderConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/geocode")
}

fn default_geocode_base_url() -> String {
    "https://us1.locationiq.com".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.weatherbit.io".to_string()
}

fn default_yelp_base_url() -> String {
    "https://api.yelp.com".to_string()
}

fn default_trails_base_url() -> String {
    "https://www.hikingproject.com".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            single_flight: true,
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocode: ProviderConfig::with_base_url(default_geocode_base_url()),
            weather: ProviderConfig::with_base_url(default_weather_base_url()),
            yelp: ProviderConfig::with_base_url(default_yelp_base_url()),
            trails: ProviderConfig::with_base_url(default_trails_base_url()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ProviderConfig {
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    /// Base URL without a trailing slash, ready for path concatenation
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// API key, or an empty string when none is configured
    #[must_use]
    pub fn key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }
}

impl ProvidersConfig {
    /// Every provider paired with its name, in a stable order
    #[must_use]
    pub fn named(&self) -> [(&'static str, &ProviderConfig); 4] {
        [
            ("geocode", &self.geocode),
            ("weather", &self.weather),
            ("yelp", &self.yelp),
            ("trails", &self.trails),
        ]
    }
}

impl ServerConfig {
    /// Certificate and key paths when TLS is configured
    #[must_use]
    pub fn tls_paths(&self) -> Option<(&PathBuf, &PathBuf)> {
        self.tls_cert_path.as_ref().zip(self.tls_key_path.as_ref())
    }
}

impl ExplorerConfig {
    /// Load configuration from `config.toml` and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides, e.g. CITY_EXPLORER__SERVER__PORT
        builder = builder.add_source(
            Environment::with_prefix("CITY_EXPLORER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ExplorerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Hosting platforms hand the listener port over as plain PORT
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value '{port}'"))?;
        }

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to fields left empty by a partial config
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.store.path.as_os_str().is_empty() {
            self.store.path = default_store_path();
        }
        if self.providers.geocode.base_url.is_empty() {
            self.providers.geocode.base_url = default_geocode_base_url();
        }
        if self.providers.weather.base_url.is_empty() {
            self.providers.weather.base_url = default_weather_base_url();
        }
        if self.providers.yelp.base_url.is_empty() {
            self.providers.yelp.base_url = default_yelp_base_url();
        }
        if self.providers.trails.base_url.is_empty() {
            self.providers.trails.base_url = default_trails_base_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_providers()?;
        self.validate_string_values()?;
        self.validate_tls()?;
        Ok(())
    }

    /// Names of providers that have no API key configured
    #[must_use]
    pub fn providers_missing_keys(&self) -> Vec<&'static str> {
        self.providers
            .named()
            .into_iter()
            .filter(|(_, provider)| provider.api_key.as_deref().is_none_or(str::is_empty))
            .map(|(name, _)| name)
            .collect()
    }

    fn validate_providers(&self) -> Result<()> {
        for (name, provider) in self.providers.named() {
            if !provider.base_url.starts_with("http://")
                && !provider.base_url.starts_with("https://")
            {
                return Err(ExplorerError::config(format!(
                    "Provider '{name}' base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ExplorerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ExplorerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    fn validate_tls(&self) -> Result<()> {
        if self.server.tls_cert_path.is_some() != self.server.tls_key_path.is_some() {
            return Err(ExplorerError::config(
                "TLS requires both tls_cert_path and tls_key_path",
            )
            .into());
        }
        Ok(())
    }
}
