//! Bounded, append-only log stream for a cycle session.
//!
//! The stream is a ring buffer: once `capacity` entries are held, pushing a
//! new line drops the oldest. This keeps long-running or repeated cycles
//! from growing memory without bound while preserving time order.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of retained log lines.
pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// One timestamped log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Time-ordered ring buffer of log entries.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        // A zero capacity would silently swallow every line.
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            timestamp: Utc::now(),
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Formatted `[HH:MM:SS] message` lines, oldest first.
    pub fn to_lines(&self) -> Vec<String> {
        self.entries.iter().map(LogEntry::to_string).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut log = LogBuffer::new(10);
        log.push("first");
        log.push("second");

        let lines = log.to_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
    }

    #[test]
    fn test_ring_drops_oldest_at_capacity() {
        let mut log = LogBuffer::new(3);
        for i in 0..5 {
            log.push(format!("line-{i}"));
        }

        assert_eq!(log.len(), 3);
        let lines = log.to_lines();
        assert!(lines[0].ends_with("line-2"));
        assert!(lines[2].ends_with("line-4"));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut log = LogBuffer::new(0);
        log.push("kept");
        assert_eq!(log.len(), 1);
        assert_eq!(log.capacity(), 1);
    }

    #[test]
    fn test_display_includes_timestamp_prefix() {
        let mut log = LogBuffer::new(4);
        log.push("hello");
        let line = log.last().unwrap().to_string();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] hello") || line.contains("] hello"));
    }
}
