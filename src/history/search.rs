//! Search functionality for query history.
//!
//! Lets callers narrow the history list by free text or by the file a
//! query targeted. All functions keep the input order (newest first).

use super::models::HistoryRecord;

/// Searches records using case-insensitive substring matching.
///
/// Matches against the query text, the response text, and the file name.
/// An empty query returns every record.
///
/// # Example
///
/// ```ignore
/// let results = search_history("revenue", &history.list());
/// ```
pub fn search_history(query: &str, records: &[HistoryRecord]) -> Vec<HistoryRecord> {
    if query.is_empty() {
        return records.to_vec();
    }

    let query_lower = query.to_lowercase();

    records
        .iter()
        .filter(|record| matches_query(record, &query_lower))
        .cloned()
        .collect()
}

fn matches_query(record: &HistoryRecord, query_lower: &str) -> bool {
    record.query.to_lowercase().contains(query_lower)
        || record.response.to_lowercase().contains(query_lower)
        || record.file_name.to_lowercase().contains(query_lower)
}

/// Returns the records that targeted `file_id`.
pub fn filter_by_file(file_id: &str, records: &[HistoryRecord]) -> Vec<HistoryRecord> {
    records
        .iter()
        .filter(|record| record.file_id == file_id)
        .cloned()
        .collect()
}

/// Finds the first record stored under `timestamp`.
///
/// With duplicate keys this is the most recently inserted one.
pub fn find_by_timestamp<'a>(
    timestamp: &str,
    records: &'a [HistoryRecord],
) -> Option<&'a HistoryRecord> {
    records.iter().find(|record| record.timestamp == timestamp)
}
