//! In-memory submission journal
//!
//! Post-submit handlers record what they did here: named logs of entries
//! and named statistics records. Each log keeps at most `log_capacity`
//! entries; the oldest are dropped first.

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

/// Entries kept per log unless configured otherwise
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

#[derive(Debug)]
pub struct SubmissionJournal {
    logs: RwLock<IndexMap<String, VecDeque<Value>>>,
    stats: RwLock<IndexMap<String, Value>>,
    log_capacity: usize,
}

impl Default for SubmissionJournal {
    fn default() -> Self {
        Self::with_log_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl SubmissionJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// A journal keeping at most `capacity` entries per log (minimum one)
    pub fn with_log_capacity(capacity: usize) -> Self {
        Self {
            logs: RwLock::default(),
            stats: RwLock::default(),
            log_capacity: capacity.max(1),
        }
    }

    pub fn log_capacity(&self) -> usize {
        self.log_capacity
    }

    /// Appends to a log; returns the log's new length
    pub fn append(&self, log: &str, entry: Value) -> usize {
        let mut logs = self.logs.write().unwrap_or_else(PoisonError::into_inner);
        let entries = logs.entry(log.to_string()).or_default();
        entries.push_back(entry);
        while entries.len() > self.log_capacity {
            entries.pop_front();
        }
        entries.len()
    }

    pub fn entries(&self, log: &str) -> Vec<Value> {
        self.logs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(log)
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Replaces a statistics record with `update(current)`
    pub fn update_stats(&self, key: &str, update: impl FnOnce(Option<&Value>) -> Value) -> Value {
        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        let next = update(stats.get(key));
        stats.insert(key.to_string(), next.clone());
        next
    }

    pub fn stats(&self, key: &str) -> Option<Value> {
        self.stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_append_and_read_back() {
        let journal = SubmissionJournal::new();
        assert_eq!(journal.append("cr_submit_logs", json!({"claimId": "CLM-1"})), 1);
        assert_eq!(journal.append("cr_submit_logs", json!({"claimId": "CLM-2"})), 2);
        assert_eq!(journal.entries("cr_submit_logs").len(), 2);
        assert!(journal.entries("pa_submit_logs").is_empty());
    }

    #[test]
    fn test_log_drops_oldest_entries_past_capacity() {
        let journal = SubmissionJournal::with_log_capacity(2);
        for n in 1..=3 {
            journal.append("pa_submit_logs", json!({"claimId": format!("CLM-{n}")}));
        }

        let entries = journal.entries("pa_submit_logs");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["claimId"], "CLM-2");
        assert_eq!(entries[1]["claimId"], "CLM-3");
    }

    #[test]
    fn test_update_stats_sees_previous_record() {
        let journal = SubmissionJournal::new();
        let count = |prev: Option<&Value>| {
            let n = prev.and_then(|v| v["count"].as_u64()).unwrap_or(0);
            json!({"count": n + 1})
        };
        journal.update_stats("zone", count);
        let latest = journal.update_stats("zone", count);
        assert_eq!(latest["count"], 2);
    }
}
