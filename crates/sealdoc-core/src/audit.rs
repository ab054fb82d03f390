//! Append-only audit trail of seal/open attempts.
//!
//! Every document operation is recorded, successful or not, for forensic
//! traceability. Recording is fire-and-forget: a sink that cannot write
//! reports the failure through `tracing` and never fails the operation it is
//! auditing.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use chrono::{Local, NaiveDateTime};

/// Timestamp layout of one audit line.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Destination for audit records.
///
/// # Invariants
///
/// - `record` never panics and never reports failure to the caller
/// - Records are appended in call order; existing records are never rewritten
pub trait AuditSink {
    /// Record one attempt of `action` on `target` with its `outcome`.
    fn record(&self, action: &str, target: &str, outcome: &str);
}

impl<T: AuditSink + ?Sized> AuditSink for &T {
    fn record(&self, action: &str, target: &str, outcome: &str) {
        (**self).record(action, target, outcome);
    }
}

impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    fn record(&self, action: &str, target: &str, outcome: &str) {
        (**self).record(action, target, outcome);
    }
}

/// One timestamped audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// Local wall-clock time of the attempt
    pub timestamp: NaiveDateTime,
    /// What was attempted (`save`, `open`, ...)
    pub action: String,
    /// File the action targeted
    pub target: String,
    /// `ok` or a failure description
    pub outcome: String,
}

impl AuditRecord {
    /// Record stamped with the current local time.
    pub fn now(action: &str, target: &str, outcome: &str) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            action: action.to_string(),
            target: target.to_string(),
            outcome: outcome.to_string(),
        }
    }

    /// Single-line text form, without trailing newline.
    ///
    /// `[2024-05-01 12:00:00] open | file: notes.sealed | result: ok`
    pub fn to_line(&self) -> String {
        format!(
            "[{}] {} | file: {} | result: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.action,
            self.target,
            self.outcome
        )
    }
}

/// Audit sink that appends lines to a text file.
///
/// The file and its parent directories are created on first write. Writes
/// from multiple threads are serialized so lines never interleave.
#[derive(Debug)]
pub struct FileAuditLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileAuditLog {
    /// Sink appending to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    /// Log file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl AuditSink for FileAuditLog {
    fn record(&self, action: &str, target: &str, outcome: &str) {
        let line = AuditRecord::now(action, target, outcome).to_line();

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = self.append(&line) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to write audit record");
        }
    }
}

/// Audit sink that keeps records in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records so far, oldest first.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&self, action: &str, target: &str, outcome: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(AuditRecord::now(action, target, outcome));
    }
}

/// Audit sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuditLog;

impl AuditSink for NullAuditLog {
    fn record(&self, _action: &str, _target: &str, _outcome: &str) {}
}
