//! Application configuration module
//!
//! Configuration is read from environment variables (and a `.env` file when
//! present) with the `WORKCYCLE` prefix. Nested values are separated by a
//! double underscore.
//!
//! # Example
//!
//! ```no_run
//! use workcycle::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod generation;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use generation::GenerationConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

const ENV_PREFIX: &str = "WORKCYCLE";

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Period generation tuning
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `WORKCYCLE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `WORKCYCLE__DATABASE__URL=...` -> `database.url = ...`
    /// - `WORKCYCLE__GENERATION__RETRY_BACKOFF_MS=500`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a value
    /// cannot be parsed into its expected type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.generation.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("WORKCYCLE__DATABASE__URL", "postgresql://test@localhost/test");
    }

    fn clear_env() {
        for key in [
            "WORKCYCLE__DATABASE__URL",
            "WORKCYCLE__SERVER__PORT",
            "WORKCYCLE__SERVER__ENVIRONMENT",
            "WORKCYCLE__GENERATION__RETRY_BACKOFF_MS",
            "WORKCYCLE__GENERATION__PREVIEW_WINDOW_COUNT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_section_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let config = AppConfig::load();
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.generation.retry_backoff_ms, 200);
        assert_eq!(config.generation.preview_window_count, 6);
    }

    #[test]
    fn test_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("WORKCYCLE__SERVER__PORT", "3000");
        env::set_var("WORKCYCLE__SERVER__ENVIRONMENT", "production");
        env::set_var("WORKCYCLE__GENERATION__RETRY_BACKOFF_MS", "50");
        env::set_var("WORKCYCLE__GENERATION__PREVIEW_WINDOW_COUNT", "12");
        let config = AppConfig::load();
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.generation.retry_backoff_ms, 50);
        assert_eq!(config.generation.preview_window_count, 12);
    }

    #[test]
    fn test_invalid_generation_section_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("WORKCYCLE__GENERATION__PREVIEW_WINDOW_COUNT", "0");
        let config = AppConfig::load();
        clear_env();

        assert_eq!(
            config.unwrap().validate(),
            Err(ValidationError::InvalidPreviewWindowCount)
        );
    }
}
