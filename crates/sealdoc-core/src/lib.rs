//! Sealdoc Core
//!
//! Tamper-evident document envelopes. A document is encrypted with SM4-CBC,
//! its plaintext hashed with SM3, and the two wrapped behind a fixed magic
//! tag. Opening reverses the process and rejects anything that does not
//! verify, with a typed reason.
//!
//! # Layers
//!
//! ```text
//! DocumentStore   whole-file read/write, audit trail
//!      │
//!      ▼
//! EnvelopeCodec   seal / open, integrity checks
//!      │
//!      ▼
//! sealdoc-crypto  SM4-CBC (Cipher) + SM3 (Hasher)
//! ```
//!
//! Only the store performs I/O. The codec and everything below it are pure
//! functions over in-memory buffers, holding nothing but key-derived state.
//!
//! # Security
//!
//! Confidentiality:
//! - SM4-CBC with a configured key and IV
//! - A fixed IV makes equal documents seal to equal envelopes; see
//!   [`EnvelopeConfig`]
//!
//! Integrity:
//! - SM3 digest of the plaintext, compared byte-for-byte after decryption
//! - Decryption failures are reported without their cause, so a caller cannot
//!   tell a wrong key from corrupted data
//!
//! Not provided: authenticated encryption, key negotiation, constant-time
//! execution.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod audit;
pub mod config;
pub mod envelope;
pub mod error;
pub mod store;

pub use audit::{AuditRecord, AuditSink, FileAuditLog, MemoryAuditLog, NullAuditLog};
pub use config::EnvelopeConfig;
pub use envelope::{Envelope, EnvelopeCodec, MAGIC_TAG, MIN_ENVELOPE_SIZE, open, seal};
pub use error::{ConfigError, EnvelopeError, StoreError};
pub use store::{Document, DocumentStore};
