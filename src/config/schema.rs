//! Configuration schema for the query history store.
//!
//! Defines the user-configurable settings and their validation rules.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage key the history blob lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "csv_rag_history";

/// Maximum number of records kept in history unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 50;

/// Directory used by the file-backed store when none is configured.
pub const DEFAULT_STORAGE_DIR: &str = ".query-history";

/// Settings for the history store.
///
/// Read from the `"query-history"` object of a JSON settings document.
/// Missing settings fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Key under which the serialized record sequence is stored.
    ///
    /// Defaults to `"csv_rag_history"`. Must not be empty.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Maximum number of records to retain.
    ///
    /// Inserting beyond this drops the oldest records. Defaults to 50.
    ///
    /// Must be > 0.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Directory for the file-backed store.
    ///
    /// Only consulted when history is kept on disk. Defaults to
    /// `.query-history` in the working directory.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            capacity: default_capacity(),
            storage_dir: None,
        }
    }
}

impl HistoryConfig {
    /// Validates the configuration and returns errors if any settings are invalid.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive error message.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".to_string());
        }

        if self.storage_key.trim().is_empty() {
            return Err("storageKey must not be empty".to_string());
        }

        Ok(())
    }

    /// Merges this configuration with another, using values from `other` where present.
    ///
    /// `storage_dir` is only taken from `other` when it is set.
    pub fn merge(&self, other: &HistoryConfig) -> Self {
        Self {
            storage_key: other.storage_key.clone(),
            capacity: other.capacity,
            storage_dir: other
                .storage_dir
                .clone()
                .or_else(|| self.storage_dir.clone()),
        }
    }

    /// The directory for file-backed history, falling back to the default.
    pub fn resolved_storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR))
    }
}

// Default value functions for serde

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}
