//! Caller-facing history operations.
//!
//! [`QueryHistory`] is what the rest of the application talks to. It fixes
//! the call shape (list, record, remove, clear) and never reports an error:
//! failures are logged by the underlying [`HistoryLog`].

use super::backend::StorageBackend;
use super::models::{HistoryRecord, NewHistoryRecord};
use super::storage::HistoryLog;
use crate::config::HistoryConfig;

/// The query history as seen by its callers.
#[derive(Debug, Clone)]
pub struct QueryHistory<S> {
    log: HistoryLog<S>,
}

impl<S: StorageBackend> QueryHistory<S> {
    /// Creates a history over `backend` using the global configuration.
    pub fn new(backend: S) -> Self {
        Self {
            log: HistoryLog::new(backend),
        }
    }

    /// Creates a history over `backend` with an explicit configuration.
    pub fn with_config(backend: S, config: HistoryConfig) -> Self {
        Self {
            log: HistoryLog::with_config(backend, config),
        }
    }

    /// Wraps an existing log.
    pub fn from_log(log: HistoryLog<S>) -> Self {
        Self { log }
    }

    /// The underlying log, for callers that want explicit results.
    pub fn log(&self) -> &HistoryLog<S> {
        &self.log
    }

    /// All records, newest first.
    pub fn list(&self) -> Vec<HistoryRecord> {
        self.log.load()
    }

    /// Records an answered query, timestamped now.
    pub fn record(
        &self,
        file_id: impl Into<String>,
        file_name: impl Into<String>,
        query: impl Into<String>,
        response: impl Into<String>,
    ) {
        self.record_entry(NewHistoryRecord::new(file_id, file_name, query, response));
    }

    /// Records a prepared entry, keeping its timestamp if it has one.
    pub fn record_entry(&self, entry: NewHistoryRecord) {
        self.log.insert(entry);
    }

    /// Deletes the record(s) with the given timestamp.
    pub fn remove(&self, timestamp: &str) {
        self.log.delete_by_key(timestamp);
    }

    /// Deletes the whole history.
    pub fn clear(&self) {
        self.log.clear_all();
    }
}
