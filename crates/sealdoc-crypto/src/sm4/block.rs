//! Key schedule and single-block transform.

use std::fmt;

use zeroize::Zeroize;

use super::{
    BLOCK_SIZE, KEY_SIZE, ROUNDS,
    tables::{CK, FK, SBOX},
};

/// SM4 keyed for single-block operation.
///
/// Holds only the 32 round keys, derived once in [`Sm4::new`] and zeroized
/// on drop. No chaining state: see [`super::Sm4Cbc`] for that.
#[derive(Clone)]
pub struct Sm4 {
    round_keys: [u32; ROUNDS],
}

impl Sm4 {
    /// Expand `key` into the round key schedule.
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        Self { round_keys: expand_key(key) }
    }

    /// Encrypt one block.
    pub fn encrypt_block(&self, block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
        transform(block, self.round_keys.iter().copied())
    }

    /// Decrypt one block (same rounds, reversed key order).
    pub fn decrypt_block(&self, block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
        transform(block, self.round_keys.iter().rev().copied())
    }
}

impl fmt::Debug for Sm4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sm4").field("round_keys", &"<redacted>").finish()
    }
}

impl Drop for Sm4 {
    fn drop(&mut self) {
        self.round_keys.zeroize();
    }
}

/// Key expansion: `K[i+4] = K[i] ^ T'(K[i+1] ^ K[i+2] ^ K[i+3] ^ CK[i])`.
fn expand_key(key: &[u8; KEY_SIZE]) -> [u32; ROUNDS] {
    let mk = load_words(key);
    let mut k = [mk[0] ^ FK[0], mk[1] ^ FK[1], mk[2] ^ FK[2], mk[3] ^ FK[3]];

    let mut round_keys = [0u32; ROUNDS];
    for (slot, ck) in round_keys.iter_mut().zip(CK) {
        let next = k[0] ^ key_linear(tau(k[1] ^ k[2] ^ k[3] ^ ck));
        *slot = next;
        k = [k[1], k[2], k[3], next];
    }

    k.zeroize();
    round_keys
}

/// 32 rounds over a sliding window of four words, then reverse.
fn transform(block: &[u8; BLOCK_SIZE], round_keys: impl Iterator<Item = u32>) -> [u8; BLOCK_SIZE] {
    let mut x = load_words(block);
    for rk in round_keys {
        let next = x[0] ^ round_linear(tau(x[1] ^ x[2] ^ x[3] ^ rk));
        x = [x[1], x[2], x[3], next];
    }

    let mut out = [0u8; BLOCK_SIZE];
    for (chunk, word) in out.chunks_exact_mut(4).zip(x.iter().rev()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    out
}

fn load_words(bytes: &[u8; 16]) -> [u32; 4] {
    let mut words = [0u32; 4];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

/// Non-linear substitution τ: S-box applied to each byte.
fn tau(x: u32) -> u32 {
    u32::from_be_bytes(x.to_be_bytes().map(|b| SBOX[b as usize]))
}

/// L, used by the cipher rounds.
fn round_linear(b: u32) -> u32 {
    b ^ b.rotate_left(2) ^ b.rotate_left(10) ^ b.rotate_left(18) ^ b.rotate_left(24)
}

/// L', used by the key schedule.
fn key_linear(b: u32) -> u32 {
    b ^ b.rotate_left(13) ^ b.rotate_left(23)
}
