//! Key material for the envelope codec.
//!
//! # Security
//!
//! The legacy editor embedded one key and one IV in the application and used
//! them for every file. A static IV makes CBC deterministic: two files with
//! the same content produce byte-identical envelopes. [`EnvelopeConfig::legacy`]
//! preserves that behavior so existing files still open. New deployments
//! should supply their own key and, where file compatibility does not matter,
//! a fresh IV per file.

use std::fmt;

use sealdoc_crypto::{BLOCK_SIZE, KEY_SIZE};
use zeroize::Zeroize;

use crate::error::ConfigError;

/// Key and IV of the legacy editor (ASCII `"0123456789012345"` for both).
const LEGACY_KEY_MATERIAL: [u8; 16] = *b"0123456789012345";

/// Key and IV used to seal and open envelopes.
///
/// Key material is zeroized on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct EnvelopeConfig {
    key: [u8; KEY_SIZE],
    iv: [u8; BLOCK_SIZE],
}

impl EnvelopeConfig {
    /// Configuration from raw key and IV bytes.
    pub fn new(key: [u8; KEY_SIZE], iv: [u8; BLOCK_SIZE]) -> Self {
        Self { key, iv }
    }

    /// The constants embedded in the legacy editor.
    ///
    /// Required to open files it produced. See the module docs for why this
    /// is weak.
    pub fn legacy() -> Self {
        Self::new(LEGACY_KEY_MATERIAL, LEGACY_KEY_MATERIAL)
    }

    /// Parse hex-encoded key and IV (surrounding whitespace is ignored).
    ///
    /// # Errors
    ///
    /// - `InvalidHex` if either value is not hexadecimal
    /// - `InvalidLength` if either value does not decode to 16 bytes
    pub fn from_hex(key_hex: &str, iv_hex: &str) -> Result<Self, ConfigError> {
        let key = decode_field("key", key_hex)?;
        let iv = decode_field("iv", iv_hex)?;
        Ok(Self::new(key, iv))
    }

    /// Resolve optional hex inputs: both set, or neither (legacy fallback).
    ///
    /// # Errors
    ///
    /// - `Missing` if exactly one of the two is provided
    /// - any error from [`Self::from_hex`]
    pub fn resolve(key_hex: Option<&str>, iv_hex: Option<&str>) -> Result<Self, ConfigError> {
        match (key_hex, iv_hex) {
            (Some(key), Some(iv)) => Self::from_hex(key, iv),
            (None, None) => {
                tracing::warn!("no key material configured, using legacy embedded key and IV");
                Ok(Self::legacy())
            },
            (Some(_), None) => Err(ConfigError::Missing { field: "iv" }),
            (None, Some(_)) => Err(ConfigError::Missing { field: "key" }),
        }
    }

    /// 16-byte cipher key.
    pub fn key(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    /// 16-byte CBC initialization vector.
    pub fn iv(&self) -> &[u8; BLOCK_SIZE] {
        &self.iv
    }

    /// Returns true if this is the legacy embedded key material.
    pub fn is_legacy(&self) -> bool {
        self.key == LEGACY_KEY_MATERIAL && self.iv == LEGACY_KEY_MATERIAL
    }
}

impl fmt::Debug for EnvelopeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeConfig")
            .field("key", &"<redacted>")
            .field("iv", &"<redacted>")
            .field("legacy", &self.is_legacy())
            .finish()
    }
}

impl Drop for EnvelopeConfig {
    fn drop(&mut self) {
        self.key.zeroize();
        self.iv.zeroize();
    }
}

fn decode_field(field: &'static str, value: &str) -> Result<[u8; 16], ConfigError> {
    let bytes = hex::decode(value.trim()).map_err(|_| ConfigError::InvalidHex { field })?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| ConfigError::InvalidLength { field, expected: 16, actual })
}
