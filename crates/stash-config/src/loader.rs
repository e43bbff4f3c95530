//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use stash_core::StashError;
use std::path::Path;
use tracing::{debug, info};

/// Configuration loader with layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `STASH_` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, StashError> {
        let config = Self::load_config(&config_dir.into())?;
        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, StashError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub const fn get(&self) -> &AppConfig {
        &self.config
    }


    fn load_config(config_dir: &str) -> Result<AppConfig, StashError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("STASH_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("STASH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_stash_error)?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_stash_error)?;
        app_config.app.environment = environment;

        ConfigValidator::validate(&app_config).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            StashError::Configuration(messages.join("; "))
        })?;

        Ok(app_config)
    }
}

fn config_error_to_stash_error(err: ConfigError) -> StashError {
    StashError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_directory_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path().join("absent").to_string_lossy()).unwrap();
        let config = loader.get();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.ttl_secs, 120);
    }

    #[test]
    fn test_layers_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 9000\n[cache]\nttl_secs = 60\n",
        )
        .unwrap();
        fs::write(dir.path().join("local.toml"), "[cache]\nsingle_flight = true\n").unwrap();

        let loader = ConfigLoader::new(dir.path().to_string_lossy()).unwrap();
        let config = loader.get();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.cache.ttl_secs, 60);
        assert!(config.cache.single_flight);
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[cache]\nttl_secs = 0\n").unwrap();

        let result = ConfigLoader::new(dir.path().to_string_lossy());
        assert!(matches!(result, Err(StashError::Configuration(_))));
    }
}
