//! Cipher block chaining over [`Sm4`].
//!
//! The chaining value starts at the IV and lives on the stack of each
//! encrypt/decrypt call. A `Sm4Cbc` instance is therefore reusable: two calls
//! never observe each other's chaining state.
//!
//! # Security
//!
//! A fixed IV makes encryption deterministic: equal plaintexts produce equal
//! ciphertexts. Callers that need semantic security must construct a fresh
//! instance with a random IV per message.

use std::fmt;

use super::{BLOCK_SIZE, KEY_SIZE, block::Sm4, error::CipherError, padding};
use crate::traits::Cipher;

/// SM4 in CBC mode with PKCS#7 padding.
#[derive(Clone)]
pub struct Sm4Cbc {
    cipher: Sm4,
    iv: [u8; BLOCK_SIZE],
}

impl Sm4Cbc {
    /// Key the cipher and fix the IV.
    pub fn new(key: &[u8; KEY_SIZE], iv: &[u8; BLOCK_SIZE]) -> Self {
        Self { cipher: Sm4::new(key), iv: *iv }
    }

    /// Pad and encrypt `plaintext`.
    ///
    /// Output length is `plaintext.len()` rounded up to the next multiple of
    /// 16, plus a full block when already aligned.
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        let padded = padding::pad(plaintext);
        let mut out = Vec::with_capacity(padded.len());

        let mut prev = self.iv;
        for chunk in padded.chunks_exact(BLOCK_SIZE) {
            let mut block = [0u8; BLOCK_SIZE];
            for ((b, &p), &c) in block.iter_mut().zip(chunk).zip(&prev) {
                *b = p ^ c;
            }
            prev = self.cipher.encrypt_block(&block);
            out.extend_from_slice(&prev);
        }

        out
    }

    /// Decrypt `ciphertext` and strip its padding.
    ///
    /// # Errors
    ///
    /// - `UnalignedLength` if `ciphertext` is not a multiple of 16 bytes;
    ///   checked before any block is processed
    /// - `InvalidPadding` if the recovered plaintext is not PKCS#7 padded
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        if !ciphertext.len().is_multiple_of(BLOCK_SIZE) {
            return Err(CipherError::UnalignedLength { len: ciphertext.len() });
        }

        let mut out = Vec::with_capacity(ciphertext.len());

        let mut prev = self.iv;
        for chunk in ciphertext.chunks_exact(BLOCK_SIZE) {
            let mut current = [0u8; BLOCK_SIZE];
            current.copy_from_slice(chunk);

            let decrypted = self.cipher.decrypt_block(&current);
            out.extend(decrypted.iter().zip(&prev).map(|(d, c)| d ^ c));
            prev = current;
        }

        let unpadded_len = padding::strip(&out)?.len();
        out.truncate(unpadded_len);
        Ok(out)
    }
}

impl Cipher for Sm4Cbc {
    fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        Sm4Cbc::encrypt(self, plaintext)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        Sm4Cbc::decrypt(self, ciphertext)
    }
}

impl fmt::Debug for Sm4Cbc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sm4Cbc").field("cipher", &self.cipher).finish_non_exhaustive()
    }
}
