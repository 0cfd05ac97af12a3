//! Text formatting for history display.
//!
//! Turns records into the strings shown in history lists and detail views.

use super::models::HistoryRecord;
use chrono::{DateTime, Local, Utc};

/// Shown when the history holds no records.
pub const EMPTY_HISTORY_MESSAGE: &str =
    "No query history yet. Start asking questions about your CSV files!";

/// Formats a list of records, one line each.
pub fn format_history_list(records: &[HistoryRecord]) -> Vec<String> {
    records.iter().map(format_history_entry).collect()
}

/// Formats a single record for list display.
///
/// Format: "QUERY [FILE NAME] (timestamp)"
/// Example: "total rows? [sales.csv] (2025-01-15 14:30:45)"
pub fn format_history_entry(record: &HistoryRecord) -> String {
    format!(
        "{} [{}] ({})",
        record.query,
        record.file_name,
        format_timestamp(record)
    )
}

/// Formats a record with its response for an expanded view.
pub fn format_history_details(record: &HistoryRecord) -> String {
    let mut output = String::new();

    output.push_str("═══════════════════════════════════════════════════════════\n");
    output.push_str(&format!("Query: {}\n", record.query));
    output.push_str(&format!(
        "File: {} ({})\n",
        record.file_name, record.file_id
    ));
    output.push_str(&format!("Asked: {}\n", format_timestamp(record)));
    output.push_str(&format!("Key: {}\n", record.timestamp));
    output.push_str("───────────────────────────────────────────────────────────\n");

    if record.response.trim().is_empty() {
        output.push_str("[Empty response]\n");
    } else {
        output.push_str(record.response.trim_end());
        output.push('\n');
    }

    output.push_str("═══════════════════════════════════════════════════════════\n");

    output
}

/// Footer line with the number of saved queries.
///
/// Example: "1 saved query", "12 saved queries"
pub fn format_history_summary(count: usize) -> String {
    format!(
        "{} saved {}",
        count,
        if count == 1 { "query" } else { "queries" }
    )
}

/// Formats the record's timestamp in local time.
///
/// Format: "YYYY-MM-DD HH:MM:SS". Keys that are not RFC 3339 are shown as-is.
pub fn format_timestamp(record: &HistoryRecord) -> String {
    match record.parsed_timestamp() {
        Some(timestamp) => {
            let local_time: DateTime<Local> = timestamp.with_timezone(&Local);
            local_time.format("%Y-%m-%d %H:%M:%S").to_string()
        }
        None => record.timestamp.clone(),
    }
}

/// Formats a relative time description (e.g., "2 hours ago", "yesterday").
pub fn format_relative_time(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(*timestamp);

    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        let minutes = duration.num_minutes();
        format!(
            "{} minute{} ago",
            minutes,
            if minutes == 1 { "" } else { "s" }
        )
    } else if duration.num_hours() < 24 {
        let hours = duration.num_hours();
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if duration.num_days() < 7 {
        let days = duration.num_days();
        if days == 1 {
            "yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if duration.num_weeks() < 4 {
        let weeks = duration.num_weeks();
        format!("{} week{} ago", weeks, if weeks == 1 { "" } else { "s" })
    } else if duration.num_days() < 365 {
        let months = duration.num_days() / 30;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = duration.num_days() / 365;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}

/// Formats a record with a relative timestamp.
///
/// Falls back to [`format_history_entry`] for keys that are not RFC 3339.
pub fn format_history_entry_relative(record: &HistoryRecord, now: &DateTime<Utc>) -> String {
    match record.parsed_timestamp() {
        Some(timestamp) => format!(
            "{} [{}] ({})",
            record.query,
            record.file_name,
            format_relative_time(&timestamp, now)
        ),
        None => format_history_entry(record),
    }
}
