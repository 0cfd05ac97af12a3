//! Property tests for ordering and capacity of the history log.

use super::{numbered_record, numbered_timestamp};
use proptest::prelude::*;
use query_history::history::HistoryLog;
use query_history::{HistoryConfig, MemoryStorage};

fn create_log(capacity: usize) -> HistoryLog<MemoryStorage> {
    let config = HistoryConfig {
        capacity,
        ..Default::default()
    };
    HistoryLog::with_config(MemoryStorage::new(), config)
}

proptest! {
    #[test]
    fn load_returns_most_recent_first(count in 0usize..120, capacity in 1usize..60) {
        let log = create_log(capacity);
        for n in 0..count {
            log.try_insert(numbered_record(n)).unwrap();
        }

        let timestamps: Vec<String> = log.load().into_iter().map(|r| r.timestamp).collect();
        let kept = count.min(capacity);
        let expected: Vec<String> = (count - kept..count).rev().map(numbered_timestamp).collect();

        prop_assert_eq!(timestamps.len(), kept);
        prop_assert_eq!(timestamps, expected);
    }

    #[test]
    fn delete_removes_only_matching_key(count in 1usize..40, pick in 0usize..40) {
        let log = create_log(50);
        for n in 0..count {
            log.try_insert(numbered_record(n)).unwrap();
        }
        let target = numbered_timestamp(pick % count);
        let before: Vec<String> = log.load().into_iter().map(|r| r.timestamp).collect();

        let removed = log.try_delete_by_key(&target).unwrap();

        let after: Vec<String> = log.load().into_iter().map(|r| r.timestamp).collect();
        let expected: Vec<String> = before.into_iter().filter(|t| *t != target).collect();
        prop_assert_eq!(removed, 1);
        prop_assert_eq!(after, expected);
    }
}
