//! Envelope codec: magic tag, SM4-CBC ciphertext, SM3 digest.
//!
//! # Format
//!
//! ```text
//! offset 0                 MAGIC_TAG           12 bytes, "NPUSECENC001"
//! offset 12                ciphertext          N bytes, N % 16 == 0, N >= 16
//! offset 12 + N            SM3(plaintext)      32 bytes
//! ```
//!
//! The digest covers the plaintext, not the ciphertext, so verifying it
//! requires a successful decryption first.
//!
//! # Validation Order
//!
//! [`EnvelopeCodec::open`] fails fast at the first violated check, cheapest
//! first:
//!
//! 1. magic tag present, else `NotManagedFile`
//! 2. at least one block plus a digest, else `MalformedStructure`
//! 3. region lengths add up, else `TamperedLength`
//! 4. decryption and padding succeed, else `TamperedDecryption`
//! 5. recomputed digest matches, else `TamperedDigest`
//! 6. plaintext is UTF-8, else `ContentDecode`
//!
//! Steps 1-3 are structural and available on their own via
//! [`Envelope::parse`].

use sealdoc_crypto::{BLOCK_SIZE, Cipher, DIGEST_SIZE, Hasher, Sm3, Sm4Cbc};

use crate::{config::EnvelopeConfig, error::EnvelopeError};

/// Magic tag identifying a managed file.
pub const MAGIC_TAG: &[u8] = b"NPUSECENC001";

/// Smallest well-formed envelope: tag, one cipher block, digest.
pub const MIN_ENVELOPE_SIZE: usize = MAGIC_TAG.len() + BLOCK_SIZE + DIGEST_SIZE;

/// Borrowed view of a structurally valid envelope.
///
/// Parsing checks layout only. Nothing here has been decrypted or verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    ciphertext: &'a [u8],
    digest: &'a [u8; DIGEST_SIZE],
}

impl<'a> Envelope<'a> {
    /// Split `bytes` into ciphertext and stored digest (zero-copy).
    ///
    /// # Errors
    ///
    /// - `NotManagedFile` if the magic tag is missing
    /// - `MalformedStructure` if shorter than [`MIN_ENVELOPE_SIZE`]
    /// - `TamperedLength` if the regions do not account for every byte
    pub fn parse(bytes: &'a [u8]) -> Result<Self, EnvelopeError> {
        let Some(body) = bytes.strip_prefix(MAGIC_TAG) else {
            return Err(EnvelopeError::NotManagedFile);
        };

        if bytes.len() < MIN_ENVELOPE_SIZE {
            return Err(EnvelopeError::MalformedStructure {
                len: bytes.len(),
                min: MIN_ENVELOPE_SIZE,
            });
        }

        let (ciphertext, digest) = body.split_at(body.len() - DIGEST_SIZE);

        let expected = MAGIC_TAG.len() + ciphertext.len() + DIGEST_SIZE;
        let length_mismatch = EnvelopeError::TamperedLength { expected, actual: bytes.len() };
        if expected != bytes.len() {
            return Err(length_mismatch);
        }
        let digest = <&[u8; DIGEST_SIZE]>::try_from(digest).map_err(|_| length_mismatch)?;

        Ok(Self { ciphertext, digest })
    }

    /// Encrypted payload (not yet checked for block alignment).
    pub fn ciphertext(&self) -> &'a [u8] {
        self.ciphertext
    }

    /// Stored SM3 digest of the plaintext.
    pub fn digest(&self) -> &'a [u8; DIGEST_SIZE] {
        self.digest
    }

    /// Total encoded length, tag included.
    pub fn encoded_len(&self) -> usize {
        MAGIC_TAG.len() + self.ciphertext.len() + DIGEST_SIZE
    }
}

/// Seals and opens envelopes with a fixed cipher and hash.
///
/// Generic over the engines so the envelope logic is independent of the
/// primitives; [`EnvelopeCodec::new`] builds the SM4-CBC / SM3 combination
/// that the file format defines.
#[derive(Debug, Clone)]
pub struct EnvelopeCodec<C = Sm4Cbc, H = Sm3> {
    cipher: C,
    hasher: H,
}

impl EnvelopeCodec {
    /// SM4-CBC / SM3 codec keyed from `config`.
    pub fn new(config: &EnvelopeConfig) -> Self {
        Self::with_engines(Sm4Cbc::new(config.key(), config.iv()), Sm3)
    }
}

impl<C: Cipher, H: Hasher> EnvelopeCodec<C, H> {
    /// Codec over arbitrary engines.
    pub fn with_engines(cipher: C, hasher: H) -> Self {
        Self { cipher, hasher }
    }

    /// Encrypt `plaintext` and wrap it as `MAGIC_TAG || ciphertext || digest`.
    pub fn seal(&self, plaintext: &[u8]) -> Vec<u8> {
        let ciphertext = self.cipher.encrypt(plaintext);
        let digest = self.hasher.hash(plaintext);

        let mut sealed = Vec::with_capacity(MAGIC_TAG.len() + ciphertext.len() + DIGEST_SIZE);
        sealed.extend_from_slice(MAGIC_TAG);
        sealed.extend_from_slice(&ciphertext);
        sealed.extend_from_slice(digest.as_bytes());

        tracing::debug!(plaintext_len = plaintext.len(), sealed_len = sealed.len(), "sealed envelope");
        sealed
    }

    /// Verify and decrypt `sealed`, returning the UTF-8 plaintext.
    ///
    /// # Errors
    ///
    /// One [`EnvelopeError`] per failed check; see the module docs for the
    /// order.
    pub fn open(&self, sealed: &[u8]) -> Result<String, EnvelopeError> {
        let plaintext = self.open_bytes(sealed)?;
        String::from_utf8(plaintext).map_err(|_| EnvelopeError::ContentDecode)
    }

    /// Verify and decrypt `sealed` without decoding the plaintext as text.
    ///
    /// Runs checks 1-5; never returns `ContentDecode`.
    pub fn open_bytes(&self, sealed: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
        let envelope = Envelope::parse(sealed)?;

        // Cause is logged for diagnostics but never returned: wrong key and
        // corrupted data must look the same to the caller.
        let plaintext = self.cipher.decrypt(envelope.ciphertext()).map_err(|err| {
            tracing::debug!(error = %err, "envelope decryption failed");
            EnvelopeError::TamperedDecryption
        })?;

        if self.hasher.hash(&plaintext).as_bytes() != envelope.digest() {
            return Err(EnvelopeError::TamperedDigest);
        }

        tracing::debug!(plaintext_len = plaintext.len(), "opened envelope");
        Ok(plaintext)
    }

    /// Run every check [`Self::open`] runs, discarding the plaintext.
    pub fn verify(&self, sealed: &[u8]) -> Result<(), EnvelopeError> {
        self.open(sealed).map(drop)
    }
}

/// Seal `plaintext` with a one-off SM4-CBC / SM3 codec.
pub fn seal(plaintext: &[u8], key: &[u8; 16], iv: &[u8; 16]) -> Vec<u8> {
    EnvelopeCodec::new(&EnvelopeConfig::new(*key, *iv)).seal(plaintext)
}

/// Open `sealed` with a one-off SM4-CBC / SM3 codec.
pub fn open(sealed: &[u8], key: &[u8; 16], iv: &[u8; 16]) -> Result<String, EnvelopeError> {
    EnvelopeCodec::new(&EnvelopeConfig::new(*key, *iv)).open(sealed)
}
