//! Error types for SM4 operations

use thiserror::Error;

/// Errors from CBC decryption.
///
/// Encryption is infallible. Callers that must not leak why decryption
/// failed (the envelope layer) collapse every variant into a single error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Ciphertext is not a whole number of 16-byte blocks
    #[error("ciphertext length {len} is not a multiple of the block size")]
    UnalignedLength {
        /// Length of the rejected ciphertext
        len: usize,
    },

    /// PKCS#7 padding is missing or malformed after decryption
    #[error("invalid padding")]
    InvalidPadding,
}
