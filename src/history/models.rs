//! Data models for query history.
//!
//! This module defines the record stored for every answered query and the
//! errors that can occur while persisting the history.

use super::backend::StorageError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single entry in the query history.
///
/// Pairs a natural-language question with the answer the query service gave
/// for one CSV file. The `timestamp` is the record's only identity: it is
/// the key used for lookup and deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Opaque identifier of the queried CSV file.
    pub file_id: String,

    /// Label of the file at query time.
    ///
    /// Kept for display even after the file is renamed or deleted.
    pub file_name: String,

    /// The question exactly as submitted.
    pub query: String,

    /// The answer returned by the query service.
    pub response: String,

    /// ISO-8601 instant at which the record was created.
    pub timestamp: String,
}

impl HistoryRecord {
    /// Parses the timestamp key as an RFC 3339 instant.
    ///
    /// Returns `None` for keys written by other tools in a format chrono
    /// does not understand; such records stay valid, they are only shown
    /// verbatim.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Input for inserting a record into the history.
///
/// Identical to [`HistoryRecord`] except that the timestamp may be left out,
/// in which case it is assigned when the record is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHistoryRecord {
    pub file_id: String,
    pub file_name: String,
    pub query: String,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl NewHistoryRecord {
    /// Creates an insert request without a timestamp.
    pub fn new(
        file_id: impl Into<String>,
        file_name: impl Into<String>,
        query: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            file_name: file_name.into(),
            query: query.into(),
            response: response.into(),
            timestamp: None,
        }
    }

    /// Sets an explicit timestamp key.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Turns the request into a stored record.
    ///
    /// A caller-supplied timestamp wins; otherwise `now` is formatted the
    /// same way [`format_iso_timestamp`] does.
    pub fn into_record(self, now: DateTime<Utc>) -> HistoryRecord {
        let timestamp = self
            .timestamp
            .unwrap_or_else(|| format_iso_timestamp(&now));

        HistoryRecord {
            file_id: self.file_id,
            file_name: self.file_name,
            query: self.query,
            response: self.response,
            timestamp,
        }
    }
}

impl From<HistoryRecord> for NewHistoryRecord {
    fn from(record: HistoryRecord) -> Self {
        Self {
            file_id: record.file_id,
            file_name: record.file_name,
            query: record.query,
            response: record.response,
            timestamp: Some(record.timestamp),
        }
    }
}

/// Formats an instant as ISO-8601 UTC with millisecond precision.
///
/// Example: `2024-05-01T12:00:00.000Z`
pub fn format_iso_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Returns the current instant as an ISO-8601 timestamp key.
pub fn current_timestamp() -> String {
    format_iso_timestamp(&Utc::now())
}

/// Errors that can occur during history operations.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The storage backend rejected a read, write or remove.
    #[error("History storage error: {0}")]
    Storage(#[from] StorageError),

    /// The record sequence could not be encoded or decoded.
    #[error("History serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
