//! Vector index configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Vector index (retrieval gateway) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// API key for the vector index service
    pub api_key: Option<String>,

    /// Host of the vector index query endpoint
    pub index_host: Option<String>,

    /// Embedding model used for query preparation
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Number of snippets to retrieve per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl RetrievalConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate retrieval configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.api_key.as_ref().is_some_and(|k| !k.is_empty()) {
            return Err(ValidationError::MissingRequired(
                "DOCPILOT__RETRIEVAL__API_KEY",
            ));
        }
        if !self.index_host.as_ref().is_some_and(|h| !h.is_empty()) {
            return Err(ValidationError::MissingRequired(
                "DOCPILOT__RETRIEVAL__INDEX_HOST",
            ));
        }
        if self.top_k == 0 {
            return Err(ValidationError::InvalidTopK);
        }
        Ok(())
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            index_host: None,
            embedding_model: default_embedding_model(),
            top_k: default_top_k(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_top_k() -> usize {
    3
}

fn default_timeout() -> u64 {
    30
}
