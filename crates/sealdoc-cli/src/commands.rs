//! Subcommand implementations.
//!
//! Each command takes its store and output stream explicitly so it can run
//! against a temporary directory and an in-memory buffer in tests.

use std::{
    ffi::OsString,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use sealdoc_core::{
    AuditSink, ConfigError, Document, DocumentStore, EnvelopeConfig, FileAuditLog, StoreError,
};
use thiserror::Error;

/// Extension appended to the input name when `seal` has no explicit output.
const SEALED_EXTENSION: &str = "sealed";

/// Errors surfaced by the `sealdoc` binary.
#[derive(Error, Debug)]
pub enum CliError {
    /// Key or IV could not be parsed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The document store rejected the operation
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Reading an input or writing an output file failed
    #[error("failed to {operation} {}: {source}", path.display())]
    Io {
        /// `read` or `write`
        operation: &'static str,
        /// File that was being accessed
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The file to seal is not UTF-8 text
    #[error("{} is not valid UTF-8 text", path.display())]
    NotText {
        /// Offending input file
        path: PathBuf,
    },

    /// Writing to standard output failed
    #[error("failed to write to stdout: {0}")]
    Stdout(#[source] io::Error),
}

/// Build a file-audited store from optional hex key material.
pub fn open_store(
    key_hex: Option<&str>,
    iv_hex: Option<&str>,
    audit_log: &Path,
) -> Result<DocumentStore<FileAuditLog>, CliError> {
    let config = EnvelopeConfig::resolve(key_hex, iv_hex)?;
    tracing::debug!(?config, audit_log = %audit_log.display(), "store configured");
    Ok(DocumentStore::new(&config, FileAuditLog::new(audit_log)))
}

/// Seal the text in `input`, returning the path that was written.
pub fn seal<A: AuditSink>(
    store: &DocumentStore<A>,
    input: &Path,
    output: Option<&Path>,
) -> Result<PathBuf, CliError> {
    let raw = fs::read(input).map_err(|source| io_error("read", input, source))?;
    let text =
        String::from_utf8(raw).map_err(|_| CliError::NotText { path: input.to_path_buf() })?;

    let output = output.map_or_else(|| sealed_path(input), Path::to_path_buf);
    store.save(&output, &text)?;
    Ok(output)
}

/// Verify and decrypt `input`, writing the plaintext to `output` or `stdout`.
///
/// With `allow_unmanaged`, a file that was never sealed opens as an empty
/// new document instead of failing.
pub fn open<A: AuditSink, W: Write>(
    store: &DocumentStore<A>,
    input: &Path,
    output: Option<&Path>,
    allow_unmanaged: bool,
    stdout: &mut W,
) -> Result<(), CliError> {
    let text = if allow_unmanaged {
        match store.load_or_new(input)? {
            Document::Managed(text) => text,
            Document::Unmanaged => String::new(),
        }
    } else {
        store.load(input)?
    };

    match output {
        Some(path) => fs::write(path, &text).map_err(|source| io_error("write", path, source)),
        None => stdout.write_all(text.as_bytes()).map_err(CliError::Stdout),
    }
}

/// Run every envelope check on `input` and report success.
pub fn verify<A: AuditSink, W: Write>(
    store: &DocumentStore<A>,
    input: &Path,
    stdout: &mut W,
) -> Result<(), CliError> {
    store.verify(input)?;
    writeln!(stdout, "{}: ok", input.display()).map_err(CliError::Stdout)
}

/// Print the lowercase hex SM3 digest of `input`.
pub fn hash<W: Write>(input: &Path, stdout: &mut W) -> Result<(), CliError> {
    let raw = fs::read(input).map_err(|source| io_error("read", input, source))?;
    writeln!(stdout, "{}", sealdoc_crypto::sm3::hash(&raw)).map_err(CliError::Stdout)
}

fn sealed_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(SEALED_EXTENSION);
    PathBuf::from(name)
}

fn io_error(operation: &'static str, path: &Path, source: io::Error) -> CliError {
    CliError::Io { operation, path: path.to_path_buf(), source }
}

#[cfg(test)]
mod tests {
    use sealdoc_core::{EnvelopeError, MemoryAuditLog};

    use super::*;

    fn store() -> DocumentStore<MemoryAuditLog> {
        DocumentStore::new(&EnvelopeConfig::legacy(), MemoryAuditLog::new())
    }

    #[test]
    fn seal_defaults_to_sealed_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        fs::write(&input, "meeting at noon").unwrap();

        let written = seal(&store(), &input, None).unwrap();
        assert_eq!(written, dir.path().join("notes.txt.sealed"));
        assert!(fs::read(&written).unwrap().starts_with(b"NPUSECENC001"));
    }

    #[test]
    fn seal_then_open_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        let sealed = dir.path().join("out.bin");
        fs::write(&input, "line one\nline two\n").unwrap();
        let store = store();

        seal(&store, &input, Some(sealed.as_path())).unwrap();

        let mut stdout = Vec::new();
        open(&store, &sealed, None, false, &mut stdout).unwrap();
        assert_eq!(stdout, b"line one\nline two\n");
    }

    #[test]
    fn open_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        let restored = dir.path().join("restored.txt");
        fs::write(&input, "restore me").unwrap();
        let store = store();

        let sealed = seal(&store, &input, None).unwrap();
        let mut stdout = Vec::new();
        open(&store, &sealed, Some(restored.as_path()), false, &mut stdout).unwrap();

        assert!(stdout.is_empty());
        assert_eq!(fs::read_to_string(&restored).unwrap(), "restore me");
    }

    #[test]
    fn seal_rejects_binary_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("image.bin");
        fs::write(&input, [0xFF, 0xD8, 0xFF]).unwrap();

        let err = seal(&store(), &input, None).unwrap_err();
        assert!(matches!(err, CliError::NotText { .. }));
    }

    #[test]
    fn unmanaged_file_needs_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("plain.txt");
        fs::write(&input, "never sealed").unwrap();
        let store = store();
        let mut stdout = Vec::new();

        let err = open(&store, &input, None, false, &mut stdout).unwrap_err();
        assert!(matches!(
            err,
            CliError::Store(StoreError::Envelope(EnvelopeError::NotManagedFile))
        ));

        open(&store, &input, None, true, &mut stdout).unwrap();
        assert!(stdout.is_empty());
    }

    #[test]
    fn verify_reports_tampering() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        fs::write(&input, "integrity").unwrap();
        let store = store();
        let sealed = seal(&store, &input, None).unwrap();

        let mut stdout = Vec::new();
        verify(&store, &sealed, &mut stdout).unwrap();
        assert!(String::from_utf8(stdout).unwrap().ends_with(": ok\n"));

        let mut raw = fs::read(&sealed).unwrap();
        raw[12] ^= 0x80;
        fs::write(&sealed, raw).unwrap();

        let err = verify(&store, &sealed, &mut Vec::new()).unwrap_err();
        let CliError::Store(err) = err else { panic!("unexpected error: {err:?}") };
        assert!(err.envelope().is_some_and(EnvelopeError::is_tampered));
    }

    #[test]
    fn hash_prints_sm3_hex() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("abc.txt");
        fs::write(&input, "abc").unwrap();

        let mut stdout = Vec::new();
        hash(&input, &mut stdout).unwrap();
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0\n"
        );
    }

    #[test]
    fn open_store_rejects_half_configured_key_material() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_store(Some("00"), None, &dir.path().join("audit.log")).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::Missing { field: "iv" })));
    }
}
