//! Relevance evaluation configuration

use serde::Deserialize;

use crate::domain::retrieval::RelevanceThresholds;

use super::error::ValidationError;

/// Relevance evaluation configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelevanceConfig {
    /// Score thresholds separating the relevance tiers
    #[serde(default)]
    pub thresholds: RelevanceThresholds,

    /// Deployment-specific off-topic keyword list; the built-in list applies
    /// when unset
    pub off_topic_keywords: Option<Vec<String>>,
}

impl RelevanceConfig {
    /// Validate relevance configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.thresholds
            .validate()
            .map_err(|_| ValidationError::InvalidThresholdOrder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_config_defaults() {
        let config = RelevanceConfig::default();
        assert_eq!(config.thresholds.high, 0.80);
        assert_eq!(config.thresholds.minimum, 0.35);
        assert!(config.off_topic_keywords.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_unordered_thresholds() {
        let config = RelevanceConfig {
            thresholds: RelevanceThresholds {
                high: 0.5,
                medium: 0.6,
                ..Default::default()
            },
            off_topic_keywords: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidThresholdOrder)
        ));
    }
}
