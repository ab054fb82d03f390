//! PKCS#7 padding to the SM4 block size.
//!
//! Padding always adds between 1 and 16 bytes, so block-aligned input gains a
//! full block. Every padded buffer is therefore non-empty and unambiguous.

use super::{BLOCK_SIZE, error::CipherError};

/// Pad `data` to a multiple of [`BLOCK_SIZE`].
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - data.len() % BLOCK_SIZE;

    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Validate and remove PKCS#7 padding, returning the unpadded prefix.
///
/// # Errors
///
/// - `InvalidPadding` if `data` is empty, the final byte is outside
///   `1..=16`, or the trailing bytes disagree with it
pub fn strip(data: &[u8]) -> Result<&[u8], CipherError> {
    let Some(&last) = data.last() else {
        return Err(CipherError::InvalidPadding);
    };

    let pad_len = usize::from(last);
    if pad_len == 0 || pad_len > BLOCK_SIZE || pad_len > data.len() {
        return Err(CipherError::InvalidPadding);
    }

    let (body, padding) = data.split_at(data.len() - pad_len);
    if padding.iter().any(|&b| b != last) {
        return Err(CipherError::InvalidPadding);
    }

    Ok(body)
}
