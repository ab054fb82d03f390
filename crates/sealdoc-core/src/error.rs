//! Error types for the sealdoc core.
//!
//! Strongly-typed errors for each layer: envelope verification (structural
//! and cryptographic rejections), key configuration, and the file-backed
//! document store.
//!
//! None of these are transient. A file that fails verification will fail
//! again; there is nothing to retry.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Reasons an envelope is rejected by [`crate::EnvelopeCodec::open`].
///
/// Checks run cheapest first, so the variant identifies the first check that
/// failed. Cryptographic failures deliberately carry no inner cause: a wrong
/// key and corrupted data are reported identically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Input does not start with the magic tag
    #[error("not a managed file")]
    NotManagedFile,

    /// Input is too short to hold a cipher block and a digest
    #[error("malformed structure: {len} bytes, need at least {min}")]
    MalformedStructure {
        /// Actual input length
        len: usize,
        /// Minimum envelope length
        min: usize,
    },

    /// Region lengths do not add up to the input length
    #[error("tampered: length mismatch (expected {expected}, got {actual})")]
    TamperedLength {
        /// Length reconstructed from the parsed regions
        expected: usize,
        /// Actual input length
        actual: usize,
    },

    /// Ciphertext could not be decrypted (bad alignment or padding)
    #[error("tampered: decryption failed")]
    TamperedDecryption,

    /// Digest of the decrypted plaintext differs from the stored digest
    #[error("tampered: hash mismatch")]
    TamperedDigest,

    /// Verified plaintext is not valid UTF-8
    #[error("content decode failure")]
    ContentDecode,
}

impl EnvelopeError {
    /// Returns true if the file looked like an envelope but failed an
    /// integrity check.
    ///
    /// Callers use this to distinguish "someone modified this file" from
    /// "this was never one of ours" ([`Self::NotManagedFile`]) or a broken
    /// file layout.
    pub fn is_tampered(&self) -> bool {
        matches!(self, Self::TamperedLength { .. } | Self::TamperedDecryption | Self::TamperedDigest)
    }
}

/// Invalid key or IV configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Value is not valid hexadecimal
    #[error("{field} is not valid hex")]
    InvalidHex {
        /// Name of the offending field
        field: &'static str,
    },

    /// Decoded value has the wrong length
    #[error("{field} must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// Name of the offending field
        field: &'static str,
        /// Required length in bytes
        expected: usize,
        /// Decoded length in bytes
        actual: usize,
    },

    /// Only one of key and IV was supplied
    #[error("{field} is required when the other half of the key material is set")]
    Missing {
        /// Name of the missing field
        field: &'static str,
    },
}

/// Errors from [`crate::DocumentStore`] operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the document failed
    #[error("failed to {operation} {}: {source}", path.display())]
    Io {
        /// `read` or `write`
        operation: &'static str,
        /// File that was being accessed
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The document was read but rejected by the envelope codec
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

impl StoreError {
    /// The envelope rejection, if this error is one.
    pub fn envelope(&self) -> Option<&EnvelopeError> {
        match self {
            Self::Envelope(err) => Some(err),
            Self::Io { .. } => None,
        }
    }
}
