//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DOCPILOT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use docpilot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod relevance;
mod retrieval;
mod server;
mod storage;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use relevance::RelevanceConfig;
pub use retrieval::RetrievalConfig;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the docpilot service.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Vector index configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Relevance evaluation configuration
    #[serde(default)]
    pub relevance: RelevanceConfig,

    /// Conversation storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `DOCPILOT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DOCPILOT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DOCPILOT__AI__API_KEY=...` -> `ai.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DOCPILOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration. Any failure here aborts
    /// startup before the service accepts requests.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.retrieval.validate()?;
        self.relevance.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_fails_validation_without_credentials() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn fully_configured_passes_validation() {
        let config = AppConfig {
            ai: AiConfig {
                api_key: Some("sk-xxx".to_string()),
                ..Default::default()
            },
            retrieval: RetrievalConfig {
                api_key: Some("pc-xxx".to_string()),
                index_host: Some("https://index.example.net".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_config_is_not_production() {
        assert!(!AppConfig::default().is_production());
    }
}
