//! Completion provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Completion provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the completion provider
    pub api_key: Option<String>,

    /// Chat model used for generation and classification
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate completion provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("DOCPILOT__AI__API_KEY"));
        }
        if self.model.is_empty() {
            return Err(ValidationError::MissingRequired("DOCPILOT__AI__MODEL"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_timeout() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "https://api.openai.com");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_validation_requires_api_key() {
        let config = AiConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("DOCPILOT__AI__API_KEY"))
        ));
    }

    #[test]
    fn test_validation_rejects_empty_key() {
        let config = AiConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_passes_with_key() {
        let config = AiConfig {
            api_key: Some("sk-xxx".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
