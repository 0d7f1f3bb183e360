//! Bounded, session-scoped activity log
//!
//! The log is the user-facing diagnostics feed of the admin session. It keeps
//! the most recent entries only (oldest evicted first) and mirrors every
//! entry to `tracing`. Handles are cheap to clone and share one buffer, so
//! several components can append to the same log.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Default number of entries kept
pub const DEFAULT_ACTIVITY_LOG_CAPACITY: usize = 50;

/// Severity tag of an activity entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// One timestamped activity message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityLogEntry {
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ActivityLogEntry {
    /// Wall-clock time of the entry in the local timezone (`HH:MM:SS`)
    pub fn display_time(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

/// Shared FIFO ring of activity entries
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: Arc<Mutex<VecDeque<ActivityLogEntry>>>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVITY_LOG_CAPACITY)
    }
}

impl ActivityLog {
    /// Create an empty log keeping at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ActivityLogEntry>> {
        // Entries are plain data; a panic elsewhere cannot leave them torn
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append an entry stamped with the current time, evicting the oldest
    /// entries beyond capacity
    pub fn append(&self, severity: Severity, message: impl Into<String>) {
        let message = message.into();

        match severity {
            Severity::Info => tracing::info!(activity = %message, "activity"),
            Severity::Success => tracing::info!(activity = %message, success = true, "activity"),
            Severity::Error => tracing::warn!(activity = %message, "activity"),
        }

        let mut entries = self.lock();
        entries.push_back(ActivityLogEntry {
            severity,
            message,
            timestamp: Utc::now(),
        });
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.append(Severity::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.append(Severity::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.append(Severity::Error, message);
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Copy of the entries, oldest first
    pub fn entries(&self) -> Vec<ActivityLogEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<ActivityLogEntry> {
        self.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
