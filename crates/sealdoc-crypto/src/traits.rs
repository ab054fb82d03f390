//! Capability traits shared by the hash and cipher engines.

use crate::{sm3::Digest, sm4::CipherError};

/// A whole-buffer symmetric cipher.
///
/// Implementations own their key-derived state and carry no state between
/// calls: encrypting the same plaintext twice yields the same ciphertext.
pub trait Cipher {
    /// Encrypt `plaintext` of any length (including zero).
    fn encrypt(&self, plaintext: &[u8]) -> Vec<u8>;

    /// Decrypt `ciphertext` produced by [`Cipher::encrypt`].
    ///
    /// # Errors
    ///
    /// - `UnalignedLength` if the input is not a whole number of blocks
    /// - `InvalidPadding` if the recovered padding is malformed (wrong key,
    ///   wrong IV, or corrupted data are indistinguishable here)
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError>;
}

/// A 256-bit hash function.
pub trait Hasher {
    /// Digest of `message`. Total: never fails for any input length.
    fn hash(&self, message: &[u8]) -> Digest;
}
