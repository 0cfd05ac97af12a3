//! Query history tracking and persistence.
//!
//! Keeps a bounded, newest-first log of past questions and answers so users
//! can review what they asked about each CSV file.
//!
//! # Features
//!
//! - Save query/response pairs under a single storage key
//! - Automatic eviction of the oldest records beyond capacity
//! - Delete by timestamp and clear-all
//! - Corrupt data is ignored instead of failing the caller
//! - Pluggable storage: files on disk or an in-memory map
//!
//! # Example
//!
//! ```ignore
//! use query_history::history::{FileStorage, QueryHistory};
//!
//! let history = QueryHistory::new(FileStorage::new(".query-history"));
//! history.record("f1", "sales.csv", "total rows?", "120");
//!
//! for record in history.list() {
//!     println!("{}: {}", record.timestamp, record.query);
//! }
//! ```

pub mod backend;
pub mod facade;
pub mod models;
pub mod search;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use backend::{FileStorage, MemoryStorage, StorageBackend, StorageError};
pub use facade::QueryHistory;
pub use models::{current_timestamp, HistoryError, HistoryRecord, NewHistoryRecord};
pub use search::{filter_by_file, find_by_timestamp, search_history};
pub use storage::{HistoryLog, InsertOutcome};
pub use ui::{
    format_history_details, format_history_entry, format_history_entry_relative,
    format_history_list, format_history_summary, EMPTY_HISTORY_MESSAGE,
};
