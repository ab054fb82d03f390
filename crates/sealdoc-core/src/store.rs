//! File-backed document store.
//!
//! The only place in the core that touches the filesystem. Files are read and
//! written whole: a document is fully buffered before any cryptographic step
//! runs, and a sealed envelope is fully built before anything is written.
//!
//! Every attempt is passed to the [`AuditSink`] with its outcome, successful
//! or not.

use std::{fs, path::Path};

use crate::{
    audit::AuditSink,
    config::EnvelopeConfig,
    envelope::EnvelopeCodec,
    error::{EnvelopeError, StoreError},
};

/// Audit action for sealing a document to disk.
pub const ACTION_SAVE: &str = "save";

/// Audit action for opening a managed document.
pub const ACTION_OPEN: &str = "open";

/// Audit action for checking a document without returning its content.
pub const ACTION_VERIFY: &str = "verify";

/// Result of [`DocumentStore::load_or_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    /// A verified envelope and its plaintext
    Managed(String),
    /// The file exists but was never sealed; treat it as a new document
    Unmanaged,
}

/// Seals documents to disk and opens them again, auditing every attempt.
#[derive(Debug)]
pub struct DocumentStore<A> {
    codec: EnvelopeCodec,
    audit: A,
}

impl<A: AuditSink> DocumentStore<A> {
    /// Store keyed from `config`, recording to `audit`.
    pub fn new(config: &EnvelopeConfig, audit: A) -> Self {
        Self { codec: EnvelopeCodec::new(config), audit }
    }

    /// Envelope codec used for every file.
    pub fn codec(&self) -> &EnvelopeCodec {
        &self.codec
    }

    /// Audit sink receiving every attempt.
    pub fn audit(&self) -> &A {
        &self.audit
    }

    /// Seal `text` and write it to `path`, replacing any existing file.
    pub fn save(&self, path: &Path, text: &str) -> Result<(), StoreError> {
        let result = self.write_sealed(path, text);
        self.record(ACTION_SAVE, path, result.as_ref().err());
        result
    }

    /// Read `path` and return its verified plaintext.
    ///
    /// # Errors
    ///
    /// - `Io` if the file cannot be read
    /// - `Envelope` with the first failed check
    pub fn load(&self, path: &Path) -> Result<String, StoreError> {
        let result = self.read_opened(path);
        self.record(ACTION_OPEN, path, result.as_ref().err());
        result
    }

    /// Read `path` and run every envelope check without returning content.
    pub fn verify(&self, path: &Path) -> Result<(), StoreError> {
        let result = self.read_opened(path).map(drop);
        self.record(ACTION_VERIFY, path, result.as_ref().err());
        result
    }

    /// Like [`Self::load`], but a file without the magic tag becomes
    /// [`Document::Unmanaged`] instead of an error.
    ///
    /// Every other rejection, tampering included, is still an error.
    pub fn load_or_new(&self, path: &Path) -> Result<Document, StoreError> {
        match self.read_opened(path) {
            Ok(text) => {
                self.record(ACTION_OPEN, path, None);
                Ok(Document::Managed(text))
            },
            Err(StoreError::Envelope(EnvelopeError::NotManagedFile)) => {
                tracing::info!(path = %path.display(), "unmanaged file opened as new document");
                self.audit.record(ACTION_OPEN, &path.display().to_string(), "opened as new");
                Ok(Document::Unmanaged)
            },
            Err(err) => {
                self.record(ACTION_OPEN, path, Some(&err));
                Err(err)
            },
        }
    }

    fn write_sealed(&self, path: &Path, text: &str) -> Result<(), StoreError> {
        let sealed = self.codec.seal(text.as_bytes());
        fs::write(path, &sealed).map_err(|source| StoreError::Io {
            operation: "write",
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), bytes = sealed.len(), "document sealed");
        Ok(())
    }

    fn read_opened(&self, path: &Path) -> Result<String, StoreError> {
        let raw = fs::read(path).map_err(|source| StoreError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source,
        })?;

        let text = self.codec.open(&raw)?;
        tracing::info!(path = %path.display(), bytes = raw.len(), "document opened");
        Ok(text)
    }

    fn record(&self, action: &str, path: &Path, error: Option<&StoreError>) {
        let outcome = match error {
            None => "ok".to_string(),
            Some(err) => {
                tracing::warn!(action, path = %path.display(), error = %err, "document operation failed");
                format!("failed ({err})")
            },
        };
        self.audit.record(action, &path.display().to_string(), &outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryAuditLog;

    fn store() -> DocumentStore<MemoryAuditLog> {
        DocumentStore::new(&EnvelopeConfig::legacy(), MemoryAuditLog::new())
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.sealed");
        let store = store();

        store.save(&path, "hello").unwrap();
        assert_eq!(store.load(&path).unwrap(), "hello");

        let records = store.audit().records();
        assert_eq!(records.len(), 2);
        assert_eq!((records[0].action.as_str(), records[0].outcome.as_str()), (ACTION_SAVE, "ok"));
        assert_eq!((records[1].action.as_str(), records[1].outcome.as_str()), (ACTION_OPEN, "ok"));
    }

    #[test]
    fn missing_file_is_io_error_and_audited() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.sealed");
        let store = store();

        let err = store.load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Io { operation: "read", .. }));

        let records = store.audit().records();
        assert_eq!(records.len(), 1);
        assert!(records[0].outcome.starts_with("failed (failed to read"));
    }

    #[test]
    fn failed_save_is_audited() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("note.sealed");
        let store = store();

        let err = store.save(&path, "lost").unwrap_err();
        assert!(matches!(err, StoreError::Io { operation: "write", .. }));
        assert!(!path.exists());

        let records = store.audit().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, ACTION_SAVE);
        assert_eq!(records[0].target, path.display().to_string());
        assert!(records[0].outcome.starts_with("failed (failed to write"), "{}", records[0].outcome);
    }

    #[test]
    fn foreign_file_falls_back_to_new_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, "just some text").unwrap();
        let store = store();

        assert_eq!(store.load_or_new(&path).unwrap(), Document::Unmanaged);

        let records = store.audit().records();
        assert_eq!(records[0].action, ACTION_OPEN);
        assert_eq!(records[0].outcome, "opened as new");
    }

    #[test]
    fn tampered_file_is_not_treated_as_new() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.sealed");
        let store = store();
        store.save(&path, "original").unwrap();

        let mut raw = fs::read(&path).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        fs::write(&path, raw).unwrap();

        let err = store.load_or_new(&path).unwrap_err();
        assert_eq!(err.envelope(), Some(&EnvelopeError::TamperedDigest));

        let records = store.audit().records();
        assert_eq!(records[1].outcome, "failed (tampered: hash mismatch)");
    }

    #[test]
    fn verify_is_audited_separately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.sealed");
        let store = store();
        store.save(&path, "check me").unwrap();

        store.verify(&path).unwrap();
        assert_eq!(store.audit().records()[1].action, ACTION_VERIFY);
    }
}
