//! Query History for CSV Question Answering
//!
//! This crate keeps the history of natural-language questions asked about
//! uploaded CSV files, together with the answers the query service returned.
//!
//! # Architecture
//!
//! The crate is organized into a few modules:
//!
//! - **history**: the persisted, capacity-bounded record log and the facade
//!   callers use (`list`, `record`, `remove`, `clear`)
//! - **config**: settings for the store (storage key, capacity, directory)
//! - **service**: interfaces to the external query service and file registry,
//!   plus the ask-then-record workflow
//!
//! # Storage Model
//!
//! The whole history is one JSON array stored under a single key, newest
//! record first. Every mutation reloads the array, changes it, and writes it
//! back. Once the array holds `capacity` records (50 by default), each insert
//! drops the oldest one.
//!
//! History is best-effort: storage failures and corrupt data are logged and
//! never reach the caller, so recording history can not break a query.
//!
//! # Usage
//!
//! ```no_run
//! use query_history::history::{MemoryStorage, QueryHistory};
//!
//! let history = QueryHistory::new(MemoryStorage::new());
//! history.record("f1", "sales.csv", "total rows?", "120");
//!
//! let records = history.list();
//! assert_eq!(records[0].file_name, "sales.csv");
//!
//! history.remove(&records[0].timestamp);
//! history.clear();
//! ```

pub mod config;
pub mod history;
pub mod service;

pub use config::HistoryConfig;
pub use history::{
    FileStorage, HistoryError, HistoryLog, HistoryRecord, MemoryStorage, NewHistoryRecord,
    QueryHistory, StorageBackend, StorageError,
};
pub use service::{ask_and_record, CsvFile, FileRegistry, QueryService, ServiceError};
