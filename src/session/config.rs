//! Session settings.

use serde::{Deserialize, Serialize};

use super::autosave::DEFAULT_AUTOSAVE_DELAY_MS;
use super::history::DEFAULT_HISTORY_LIMIT;
use crate::error::{ToolkitError, ToolkitResult};

/// Fixed key the whole project is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "mini-production-toolkit-project";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Quiet period after the last edit before an autosave runs.
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            autosave_delay_ms: default_autosave_delay_ms(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_autosave_delay_ms() -> u64 {
    DEFAULT_AUTOSAVE_DELAY_MS
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl SessionConfig {
    /// Parses a TOML document; missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> ToolkitResult<Self> {
        let config: SessionConfig =
            toml::from_str(source).map_err(|e| ToolkitError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ToolkitResult<String> {
        toml::to_string_pretty(self).map_err(|e| ToolkitError::config(e.to_string()))
    }

    pub fn validate(&self) -> ToolkitResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(ToolkitError::config("storage_key must not be empty"));
        }
        if self.history_limit == 0 {
            return Err(ToolkitError::config("history_limit must be at least 1"));
        }
        Ok(())
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_autosave_delay_ms(mut self, delay_ms: u64) -> Self {
        self.autosave_delay_ms = delay_ms;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}
