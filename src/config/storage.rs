//! Conversation storage configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Conversation storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for conversation files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.trim().is_empty() {
            return Err(ValidationError::EmptyDataDir);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data/conversations".to_string()
}
