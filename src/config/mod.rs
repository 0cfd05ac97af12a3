//! Configuration management for the query history store.
//!
//! Configuration is read from the `"query-history"` key of a JSON settings
//! document, merged with defaults, validated, and kept in a process-wide
//! singleton.

pub mod schema;

pub use schema::{HistoryConfig, DEFAULT_CAPACITY, DEFAULT_STORAGE_DIR, DEFAULT_STORAGE_KEY};

use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::RwLock;

/// Settings key holding the history configuration.
pub const SETTINGS_KEY: &str = "query-history";

/// Global configuration instance.
///
/// Lazily initialized with defaults on first access.
static CONFIG: Lazy<RwLock<HistoryConfig>> = Lazy::new(|| RwLock::new(HistoryConfig::default()));

/// Loads configuration from a JSON settings document.
///
/// Reads the `"query-history"` object, merges it with defaults, validates the
/// result, and updates the global configuration. Unparseable settings are
/// logged and replaced by defaults.
///
/// # Example
///
/// ```no_run
/// use query_history::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "query-history": {
///         "capacity": 100
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.capacity, 100);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<HistoryConfig, String> {
    let mut config = HistoryConfig::default();

    if let Some(settings) = settings_json {
        if let Some(history_settings) = settings.get(SETTINGS_KEY) {
            match serde_json::from_value::<HistoryConfig>(history_settings.clone()) {
                Ok(user_config) => {
                    config = config.merge(&user_config);
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse {} settings: {}. Using defaults.",
                        SETTINGS_KEY,
                        e
                    );
                }
            }
        }
    }

    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {}. Using defaults.", e))?;

    if let Ok(mut global_config) = CONFIG.write() {
        *global_config = config.clone();
    }

    Ok(config)
}

/// Gets the current global configuration.
///
/// Returns the defaults if nothing has been loaded yet.
pub fn get_config() -> HistoryConfig {
    CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_else(|_| HistoryConfig::default())
}

/// Updates the global configuration in place.
///
/// An update that fails validation resets the configuration to defaults.
pub fn update_config<F>(updater: F)
where
    F: FnOnce(&mut HistoryConfig),
{
    if let Ok(mut config) = CONFIG.write() {
        updater(&mut config);

        if let Err(e) = config.validate() {
            log::warn!("Configuration validation failed after update: {}", e);
            *config = HistoryConfig::default();
        }
    }
}

/// Resets the configuration to defaults.
pub fn reset_config() {
    if let Ok(mut config) = CONFIG.write() {
        *config = HistoryConfig::default();
    }
}
