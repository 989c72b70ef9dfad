//! Append-only, per-run log recorder

use chrono::Utc;
use parking_lot::Mutex;
use playdeck_api_types::{IdSequence, LogLevel, RecordId, RunLogEntry};

struct LogTable {
    ids: IdSequence,
    entries: Vec<RunLogEntry>,
}

/// Records leveled log lines for runs
///
/// Entry identifiers are global across runs. Entries for one run come back in
/// the order they were appended.
pub struct RunLogRecorder {
    inner: Mutex<LogTable>,
}

impl RunLogRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LogTable {
                ids: IdSequence::new(),
                entries: Vec::new(),
            }),
        }
    }

    /// Append a line for `run_id`
    pub fn append(&self, run_id: RecordId, message: impl Into<String>, level: LogLevel) -> RunLogEntry {
        let mut table = self.inner.lock();
        let entry = RunLogEntry {
            id: table.ids.next_id(),
            run_id,
            message: message.into(),
            level,
            timestamp: Utc::now(),
        };
        table.entries.push(entry.clone());
        entry
    }

    /// All entries for `run_id`, oldest first. Unknown runs yield an empty list.
    pub fn query(&self, run_id: RecordId) -> Vec<RunLogEntry> {
        self.inner
            .lock()
            .entries
            .iter()
            .filter(|entry| entry.run_id == run_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RunLogRecorder {
    fn default() -> Self {
        Self::new()
    }
}
