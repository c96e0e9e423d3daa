use std::collections::HashMap;

use super::PersistenceStore;
use crate::error::{ToolkitError, ToolkitResult};

/// In-memory storage with the failure modes of browser local storage.
///
/// Can be switched unavailable (every call fails) or given a byte quota
/// (oversized writes fail). Counts successful writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    unavailable: bool,
    quota: Option<usize>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Seed a value.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder: Reject writes whose value exceeds `bytes`.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Value stored under `key`, bypassing availability checks.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl PersistenceStore for MemoryStore {
    fn read(&self, key: &str) -> ToolkitResult<Option<String>> {
        if self.unavailable {
            return Err(ToolkitError::store_unavailable("storage is not available"));
        }
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> ToolkitResult<()> {
        if self.unavailable {
            return Err(ToolkitError::store_unavailable("storage is not available"));
        }
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(ToolkitError::store_unavailable(format!(
                    "quota exceeded: {} bytes > {} bytes",
                    value.len(),
                    quota
                )));
            }
        }
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
