use crate::error::{QueueError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Queue engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Prefix for ticket IDs (e.g. "T" gives T1, T2, ...)
    pub id_prefix: String,

    /// chrono format used to stamp `createdDate`
    pub date_format: String,

    /// chrono format used to stamp `createdTime`
    pub time_format: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            id_prefix: "T".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            time_format: "%H:%M".to_string(),
        }
    }
}

impl QueueConfig {
    /// Parses a JSON document, filling missing keys with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let prefix = self.id_prefix.trim();
        if prefix.is_empty() {
            return Err(QueueError::ConfigError("id_prefix must not be empty".into()));
        }
        // Parsed IDs are trimmed, so a padded prefix would never match a live ticket
        if prefix != self.id_prefix {
            return Err(QueueError::ConfigError(format!(
                "id_prefix '{}' must not have surrounding whitespace",
                self.id_prefix
            )));
        }
        if prefix.chars().any(|c| c.is_ascii_digit()) {
            return Err(QueueError::ConfigError(format!(
                "id_prefix '{}' must not contain digits",
                self.id_prefix
            )));
        }
        if self.date_format.is_empty() || self.time_format.is_empty() {
            return Err(QueueError::ConfigError(
                "date_format and time_format must not be empty".into(),
            ));
        }
        Ok(())
    }
}
