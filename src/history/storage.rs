//! Persistent, capacity-bounded storage for query history.
//!
//! The whole history is kept as one JSON array under a single storage key,
//! newest record first. Every mutation reads the array, changes it, and
//! writes it back in one `set_item` call; there is no incremental format.
//!
//! Each operation comes in two flavours:
//!
//! - `try_*` returns an explicit `Result` so callers and tests can see what
//!   happened.
//! - The plain variant logs any failure and returns normally. History is
//!   best-effort and must never interrupt the query workflow.

use super::backend::StorageBackend;
use super::models::{HistoryError, HistoryRecord, NewHistoryRecord};
use crate::config::{get_config, HistoryConfig};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Result of a successful insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    /// The record as stored, with its timestamp filled in.
    pub record: HistoryRecord,

    /// Number of old records dropped to stay within capacity.
    pub evicted: usize,
}

/// The durable, newest-first history log.
///
/// Generic over the storage backend so the same logic runs against files,
/// memory, or any other key/value store.
#[derive(Debug, Clone)]
pub struct HistoryLog<S> {
    backend: S,
    config: HistoryConfig,
}

impl<S: StorageBackend> HistoryLog<S> {
    /// Creates a log over `backend` using the global configuration.
    pub fn new(backend: S) -> Self {
        Self::with_config(backend, get_config())
    }

    /// Creates a log over `backend` with an explicit configuration.
    ///
    /// An invalid configuration is replaced by the defaults.
    pub fn with_config(backend: S, config: HistoryConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("Invalid history configuration: {}. Using defaults.", e);
                HistoryConfig::default()
            }
        };
        Self { backend, config }
    }

    /// The configuration this log was created with.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// The underlying storage backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Loads all records, newest first.
    ///
    /// Absent, empty, or corrupt data yields an empty list. Only a failure of
    /// the storage backend itself is returned as an error.
    pub fn try_load(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        let blob = self.backend.get_item(&self.config.storage_key)?;

        Ok(match blob {
            Some(blob) => decode_records(&blob),
            None => Vec::new(),
        })
    }

    /// Loads all records, newest first, returning an empty list on any failure.
    pub fn load(&self) -> Vec<HistoryRecord> {
        self.try_load().unwrap_or_else(|e| {
            log::error!("Failed to load query history: {}", e);
            Vec::new()
        })
    }

    /// Inserts a record at the front, stamping it with the current time if
    /// it has no timestamp.
    pub fn try_insert(&self, record: NewHistoryRecord) -> Result<InsertOutcome, HistoryError> {
        self.try_insert_at(record, Utc::now())
    }

    /// Inserts a record at the front, using `now` as the default timestamp.
    ///
    /// The oldest records beyond capacity are dropped. Timestamps are not
    /// checked for collisions: a duplicate key is stored as a separate record.
    pub fn try_insert_at(
        &self,
        record: NewHistoryRecord,
        now: DateTime<Utc>,
    ) -> Result<InsertOutcome, HistoryError> {
        let record = record.into_record(now);

        let existing = self.try_load()?;
        let mut records = Vec::with_capacity(existing.len() + 1);
        records.push(record.clone());
        records.extend(existing);

        let evicted = records.len().saturating_sub(self.config.capacity);
        records.truncate(self.config.capacity);

        self.persist(&records)?;

        log::debug!(
            "Stored history record {} ({} total, {} evicted)",
            record.timestamp,
            records.len(),
            evicted
        );

        Ok(InsertOutcome { record, evicted })
    }

    /// Inserts a record, logging instead of returning any failure.
    pub fn insert(&self, record: NewHistoryRecord) {
        if let Err(e) = self.try_insert(record) {
            log::error!("Failed to add query to history: {}", e);
        }
    }

    /// Removes every record whose timestamp equals `timestamp`.
    ///
    /// Returns the number of records removed. Nothing is written when no
    /// record matches.
    pub fn try_delete_by_key(&self, timestamp: &str) -> Result<usize, HistoryError> {
        let mut records = self.try_load()?;
        let before = records.len();
        records.retain(|record| record.timestamp != timestamp);
        let removed = before - records.len();

        if removed == 0 {
            return Ok(0);
        }

        self.persist(&records)?;
        log::debug!("Deleted {} history record(s) at {}", removed, timestamp);

        Ok(removed)
    }

    /// Removes records by timestamp, logging instead of returning any failure.
    pub fn delete_by_key(&self, timestamp: &str) {
        if let Err(e) = self.try_delete_by_key(timestamp) {
            log::error!("Failed to delete history record {}: {}", timestamp, e);
        }
    }

    /// Removes the stored blob entirely.
    ///
    /// Clearing an already empty history succeeds.
    pub fn try_clear_all(&self) -> Result<(), HistoryError> {
        self.backend.remove_item(&self.config.storage_key)?;
        log::debug!("Cleared query history");
        Ok(())
    }

    /// Clears the history, logging instead of returning any failure.
    pub fn clear_all(&self) {
        if let Err(e) = self.try_clear_all() {
            log::error!("Failed to clear query history: {}", e);
        }
    }

    fn persist(&self, records: &[HistoryRecord]) -> Result<(), HistoryError> {
        let json = serde_json::to_string(records)?;
        self.backend.set_item(&self.config.storage_key, &json)?;
        Ok(())
    }
}

/// Decodes a stored blob into records.
///
/// Invalid JSON or a non-array value decodes to an empty list. Array elements
/// that are not valid records are skipped.
fn decode_records(blob: &str) -> Vec<HistoryRecord> {
    if blob.trim().is_empty() {
        return Vec::new();
    }

    let values = match serde_json::from_str::<Value>(blob) {
        Ok(Value::Array(values)) => values,
        Ok(other) => {
            log::warn!(
                "Ignoring stored history: expected a JSON array, found {}",
                json_kind(&other)
            );
            return Vec::new();
        }
        Err(e) => {
            log::warn!("Ignoring unparseable stored history: {}", e);
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<HistoryRecord>(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                log::warn!("Skipping corrupted history record at index {}: {}", index, e);
            }
        }
    }

    records
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
