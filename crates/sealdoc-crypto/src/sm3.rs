//! SM3 cryptographic hash (GB/T 32905-2016)
//!
//! Merkle-Damgård construction over 64-byte blocks with an 8-word state.
//! Each call to [`hash`] owns a fresh state initialized from [`IV`]; nothing
//! is shared between calls.

use std::fmt;

use crate::traits::Hasher;

/// Size of an SM3 digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// Message block size in bytes.
const BLOCK_LEN: usize = 64;

/// Offset within the final block where the 64-bit length field starts.
const LENGTH_OFFSET: usize = 56;

/// Public initialization vector.
const IV: [u32; 8] = [
    0x7380_166F,
    0x4914_B2B9,
    0x1724_42D7,
    0xDA8A_0600,
    0xA96F_30BC,
    0x1631_38AA,
    0xE38D_EE4D,
    0xB0FB_0E4E,
];

/// Round constant for rounds 0..16
const T_LOW: u32 = 0x79CC_4519;

/// Round constant for rounds 16..64
const T_HIGH: u32 = 0x7A87_9D8A;

/// A 256-bit SM3 digest.
///
/// Compared byte-for-byte; no normalization.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Wrap raw digest bytes.
    pub const fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Lowercase hex encoding (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// SM3 as a [`Hasher`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Sm3;

impl Hasher for Sm3 {
    fn hash(&self, message: &[u8]) -> Digest {
        hash(message)
    }
}

/// Compute the SM3 digest of `message`.
pub fn hash(message: &[u8]) -> Digest {
    let padded = pad(message);

    let mut state = IV;
    for block in padded.chunks_exact(BLOCK_LEN) {
        compress(&mut state, block);
    }

    let mut out = [0u8; DIGEST_SIZE];
    for (chunk, word) in out.chunks_exact_mut(4).zip(state) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    Digest(out)
}

/// Append `0x80`, zero-fill to 56 mod 64, then the big-endian bit length.
fn pad(message: &[u8]) -> Vec<u8> {
    let bit_len = (message.len() as u64).wrapping_mul(8);

    let mut padded = Vec::with_capacity(message.len() + BLOCK_LEN + 8);
    padded.extend_from_slice(message);
    padded.push(0x80);

    let zeros = (BLOCK_LEN + LENGTH_OFFSET - padded.len() % BLOCK_LEN) % BLOCK_LEN;
    padded.resize(padded.len() + zeros, 0);
    padded.extend_from_slice(&bit_len.to_be_bytes());

    padded
}

/// Expand one 64-byte block into `W[0..68)` and `W'[0..64)`.
fn expand(block: &[u8]) -> ([u32; 68], [u32; 64]) {
    let mut w = [0u32; 68];
    for (word, chunk) in w.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    for j in 16..68 {
        w[j] = p1(w[j - 16] ^ w[j - 9] ^ w[j - 3].rotate_left(15))
            ^ w[j - 13].rotate_left(7)
            ^ w[j - 6];
    }

    let mut w_prime = [0u32; 64];
    for j in 0..64 {
        w_prime[j] = w[j] ^ w[j + 4];
    }

    (w, w_prime)
}

/// Compression function CF: fold one block into `state`.
fn compress(state: &mut [u32; 8], block: &[u8]) {
    let (w, w_prime) = expand(block);
    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

    for j in 0..64 {
        let a12 = a.rotate_left(12);
        let ss1 = a12
            .wrapping_add(e)
            .wrapping_add(t(j).rotate_left((j % 32) as u32))
            .rotate_left(7);
        let ss2 = ss1 ^ a12;
        let tt1 = ff(a, b, c, j).wrapping_add(d).wrapping_add(ss2).wrapping_add(w_prime[j]);
        let tt2 = gg(e, f, g, j).wrapping_add(h).wrapping_add(ss1).wrapping_add(w[j]);

        d = c;
        c = b.rotate_left(9);
        b = a;
        a = tt1;
        h = g;
        g = f.rotate_left(19);
        f = e;
        e = p0(tt2);
    }

    for (v, x) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *v ^= x;
    }
}

fn t(j: usize) -> u32 {
    if j < 16 { T_LOW } else { T_HIGH }
}

fn ff(x: u32, y: u32, z: u32, j: usize) -> u32 {
    if j < 16 { x ^ y ^ z } else { (x & y) | (x & z) | (y & z) }
}

fn gg(x: u32, y: u32, z: u32, j: usize) -> u32 {
    if j < 16 { x ^ y ^ z } else { (x & y) | (!x & z) }
}

fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_vector_abc() {
        assert_eq!(
            hash(b"abc").to_hex(),
            "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
        );
    }

    #[test]
    fn standard_vector_512_bit_message() {
        let message = b"abcd".repeat(16);
        assert_eq!(
            hash(&message).to_hex(),
            "debe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732"
        );
    }

    #[test]
    fn empty_message() {
        assert_eq!(
            hash(b"").to_hex(),
            "1ab21d8355cfa17f8e61194831e81a8f22bec8c728fefb747ed035eb5082aa2b"
        );
    }

    #[test]
    fn padding_fits_single_block_up_to_55_bytes() {
        assert_eq!(pad(&[0u8; 0]).len(), 64);
        assert_eq!(pad(&[0u8; 55]).len(), 64);
        assert_eq!(pad(&[0u8; 56]).len(), 128);
        assert_eq!(pad(&[0u8; 64]).len(), 128);
    }

    #[test]
    fn padding_layout() {
        let padded = pad(b"abc");

        assert_eq!(&padded[0..3], b"abc");
        assert_eq!(padded[3], 0x80);
        assert!(padded[4..56].iter().all(|&b| b == 0));
        assert_eq!(&padded[56..64], &24u64.to_be_bytes());
    }

    #[test]
    fn hasher_trait_matches_free_function() {
        assert_eq!(Sm3.hash(b"sealdoc"), hash(b"sealdoc"));
    }

    #[test]
    fn display_is_lowercase_hex() {
        let digest = Digest::from_bytes([0xAB; DIGEST_SIZE]);
        assert_eq!(digest.to_string(), "ab".repeat(32));
        assert_eq!(format!("{digest:?}"), format!("Digest({})", "ab".repeat(32)));
    }
}
