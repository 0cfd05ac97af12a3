//! Integration tests module for Query History
//!
//! Shared helpers for exercising the history store against real files.

pub mod end_to_end_test;
pub mod property_test;

use query_history::{FileStorage, HistoryConfig, NewHistoryRecord, QueryHistory};
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a file-backed history in a fresh temporary directory.
pub fn create_file_history() -> (TempDir, QueryHistory<FileStorage>) {
    init_test_env();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let history = QueryHistory::with_config(
        FileStorage::new(temp_dir.path()),
        HistoryConfig::default(),
    );
    (temp_dir, history)
}

/// Builds the n-th test record with timestamp `T{n}` encoded as an instant.
pub fn numbered_record(n: usize) -> NewHistoryRecord {
    NewHistoryRecord::new(
        format!("file-{}", n),
        format!("data-{}.csv", n),
        format!("question {}", n),
        format!("answer {}", n),
    )
    .with_timestamp(numbered_timestamp(n))
}

/// Timestamp key for the n-th record; increases with n.
pub fn numbered_timestamp(n: usize) -> String {
    format!("2024-01-01T{:02}:{:02}:00.000Z", n / 60, n % 60)
}
