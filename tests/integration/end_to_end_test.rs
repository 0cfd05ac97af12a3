//! End-to-end integration tests for Query History
//!
//! These tests drive the public API against a real directory on disk, the
//! way the CLI and any embedding application use it.

use super::{create_file_history, numbered_record, numbered_timestamp};
use chrono::DateTime;
use query_history::history::{HistoryLog, StorageBackend};
use query_history::{
    ask_and_record, CsvFile, FileStorage, HistoryConfig, NewHistoryRecord, QueryHistory,
    QueryService, ServiceError,
};
use std::fs;

#[test]
fn test_record_without_timestamp_on_disk() {
    let (_temp_dir, history) = create_file_history();

    history.record("f1", "sales.csv", "total rows?", "120");

    let records = history.list();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file_name, "sales.csv");
    assert!(
        DateTime::parse_from_rfc3339(&records[0].timestamp).is_ok(),
        "timestamp should be ISO-8601: {}",
        records[0].timestamp
    );
}

#[test]
fn test_fifty_one_inserts_evict_first() {
    let (_temp_dir, history) = create_file_history();

    for n in 1..=51 {
        history.record_entry(numbered_record(n));
    }

    let records = history.list();
    assert_eq!(records.len(), 50);
    assert_eq!(records[0].timestamp, numbered_timestamp(51));
    assert!(records.iter().all(|r| r.timestamp != numbered_timestamp(1)));
}

#[test]
fn test_delete_newest_keeps_relative_order() {
    let (_temp_dir, history) = create_file_history();
    for n in 1..=51 {
        history.record_entry(numbered_record(n));
    }

    history.remove(&numbered_timestamp(51));

    let timestamps: Vec<String> = history.list().into_iter().map(|r| r.timestamp).collect();
    let expected: Vec<String> = (2..=50).rev().map(numbered_timestamp).collect();
    assert_eq!(timestamps.len(), 49);
    assert_eq!(timestamps, expected);
}

#[test]
fn test_sixty_inserts_keep_fifty_newest() {
    let (_temp_dir, history) = create_file_history();
    for n in 1..=60 {
        history.record_entry(numbered_record(n));
    }

    let timestamps: Vec<String> = history.list().into_iter().map(|r| r.timestamp).collect();
    let expected: Vec<String> = (11..=60).rev().map(numbered_timestamp).collect();
    assert_eq!(timestamps, expected);
}

#[test]
fn test_clear_removes_file_and_is_idempotent() {
    let (temp_dir, history) = create_file_history();
    history.record_entry(numbered_record(1));

    let path = temp_dir.path().join("csv_rag_history.json");
    assert!(path.exists());

    history.clear();
    assert!(!path.exists());
    history.clear();
    assert!(history.list().is_empty());
}

#[test]
fn test_history_survives_reopen() {
    let (temp_dir, history) = create_file_history();
    history.record_entry(numbered_record(1));
    history.record_entry(numbered_record(2));
    drop(history);

    let reopened = QueryHistory::with_config(
        FileStorage::new(temp_dir.path()),
        HistoryConfig::default(),
    );
    let ids: Vec<String> = reopened.list().into_iter().map(|r| r.file_id).collect();
    assert_eq!(ids, vec!["file-2", "file-1"]);
}

#[test]
fn test_corrupt_file_is_ignored_then_overwritten() {
    let (temp_dir, history) = create_file_history();
    let path = temp_dir.path().join("csv_rag_history.json");
    fs::write(&path, "[{\"fileId\": truncated").unwrap();

    assert!(history.list().is_empty());
    assert!(path.exists());

    history.record_entry(numbered_record(1));
    let records = history.list();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file_id, "file-1");
}

#[test]
fn test_invalid_utf8_file_is_ignored_then_overwritten() {
    let (temp_dir, history) = create_file_history();
    let path = temp_dir.path().join("csv_rag_history.json");
    fs::write(&path, [0xff, 0xfe, b'[', b']']).unwrap();

    assert!(history.list().is_empty());
    assert!(history.log().try_load().unwrap().is_empty());

    history.record("f1", "sales.csv", "total rows?", "120");
    let records = history.list();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file_name, "sales.csv");
}

#[test]
fn test_reads_history_written_by_other_tools() {
    let (temp_dir, history) = create_file_history();
    let path = temp_dir.path().join("csv_rag_history.json");
    fs::write(
        &path,
        r#"[{"fileId":"abc","fileName":"people.csv","query":"oldest person?","response":"Ann, 97","timestamp":"2023-11-02T09:15:30.123Z"}]"#,
    )
    .unwrap();

    let records = history.list();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file_name, "people.csv");
    assert_eq!(records[0].response, "Ann, 97");
}

#[test]
fn test_custom_storage_key_and_capacity() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config = HistoryConfig {
        storage_key: "team_history".to_string(),
        capacity: 5,
        storage_dir: None,
    };
    let log = HistoryLog::with_config(FileStorage::new(temp_dir.path()), config);

    for n in 1..=8 {
        log.try_insert(numbered_record(n)).unwrap();
    }

    assert!(temp_dir.path().join("team_history.json").exists());
    assert_eq!(log.load().len(), 5);
    assert_eq!(log.load()[4].timestamp, numbered_timestamp(4));
}

#[test]
fn test_invalid_storage_key_is_swallowed() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config = HistoryConfig {
        storage_key: "../outside".to_string(),
        ..Default::default()
    };
    let history = QueryHistory::with_config(FileStorage::new(temp_dir.path()), config);

    history.record("f1", "sales.csv", "q", "r");
    assert!(history.list().is_empty());
    assert!(history.log().try_load().is_err());
}

#[test]
fn test_two_handles_share_one_directory() {
    let (temp_dir, tab_a) = create_file_history();
    let tab_b = QueryHistory::with_config(
        FileStorage::new(temp_dir.path()),
        HistoryConfig::default(),
    );

    tab_a.record_entry(numbered_record(1));
    tab_b.record_entry(numbered_record(2));

    // Each mutation reloads first, so neither write is lost here
    let ids: Vec<String> = tab_a.list().into_iter().map(|r| r.file_id).collect();
    assert_eq!(ids, vec!["file-2", "file-1"]);
    assert_eq!(
        tab_b.log().backend().get_item("csv_rag_history").unwrap(),
        tab_a.log().backend().get_item("csv_rag_history").unwrap()
    );
}

struct EchoService;

impl QueryService for EchoService {
    fn query_file(&self, file_id: &str, query: &str) -> Result<String, ServiceError> {
        if query.is_empty() {
            return Err(ServiceError::Rejected("empty query".to_string()));
        }
        Ok(format!("{} answered for {}", query, file_id))
    }
}

#[test]
fn test_query_workflow_records_answers() {
    let (_temp_dir, history) = create_file_history();
    let file = CsvFile::new("f1", "sales.csv");

    let answer = ask_and_record(&EchoService, &history, &file, "total rows?").unwrap();
    assert_eq!(answer, "total rows? answered for f1");
    assert!(ask_and_record(&EchoService, &history, &file, "").is_err());

    let records = history.list();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].response, answer);
}

#[test]
fn test_reinserting_loaded_record_duplicates_key() {
    let (_temp_dir, history) = create_file_history();
    history.record_entry(numbered_record(1));

    let existing = history.list().remove(0);
    history.record_entry(NewHistoryRecord::from(existing.clone()));

    let records = history.list();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], existing);
    assert_eq!(records[1], existing);
}
