//! Configuration loader with layered sources.

use crate::{AppConfig, StorageBackend};
use config::{Config, ConfigError, Environment, File};
use sightline_core::SightlineError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Prefix of environment variables that override file configuration.
pub const ENV_PREFIX: &str = "SIGHTLINE";

/// Configuration loader backed by layered TOML files and the environment.
///
/// Loading normally happens before the tracing subscriber is installed, so
/// the loader's own log lines are best-effort. Callers log a summary of the
/// resolved configuration once logging is up.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Uncommitted local overrides
    /// 4. Environment variables with `SIGHTLINE_` prefix and `__` separator
    pub fn new(config_dir: impl Into<String>) -> Result<Self, SightlineError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let config = Self::load_config(&config_dir.into(), &current_environment())?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, SightlineError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Loads configuration from `config_dir` for the named environment.
    pub fn load_config(config_dir: &str, environment: &str) -> Result<AppConfig, SightlineError> {
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment, "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_sightline_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_sightline_error)?;

        validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Gets a specific configuration value by key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

/// Validates the configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), SightlineError> {
    if config.storage.backend == StorageBackend::Mysql && config.storage.database.url.is_empty() {
        return Err(SightlineError::Configuration(
            "Database URL is required for the mysql backend".to_string(),
        ));
    }

    if config.storage.backend == StorageBackend::Memory && config.app.environment == "production" {
        warn!("Using the in-memory storage backend in production; data will not survive restarts");
    }

    if config.cache.enabled && config.cache.ttl_secs == 0 {
        return Err(SightlineError::Configuration(
            "cache.ttl_secs must be positive when the cache is enabled".to_string(),
        ));
    }

    if config.views.dedup_window_secs == 0 {
        return Err(SightlineError::Configuration(
            "views.dedup_window_secs must be positive".to_string(),
        ));
    }

    if config.views.serialize_per_profile && config.views.lock_stripes == 0 {
        return Err(SightlineError::Configuration(
            "views.lock_stripes must be positive when serialize_per_profile is on".to_string(),
        ));
    }

    Ok(())
}

fn current_environment() -> String {
    std::env::var(format!("{}_ENVIRONMENT", ENV_PREFIX)).unwrap_or_else(|_| "development".to_string())
}

fn config_error_to_sightline_error(err: ConfigError) -> SightlineError {
    SightlineError::Configuration(err.to_string())
}
