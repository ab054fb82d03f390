//! Fuzz target for Sm4Cbc::decrypt
//!
//! Decrypts arbitrary ciphertext under arbitrary key material to shake out
//! panics in block chaining and padding removal.
//!
//! # Invariants
//!
//! - Unaligned input is rejected with its length; empty input as bad padding
//! - A successful decryption is shorter than its ciphertext by 1..=16 bytes
//! - NEVER panic

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sealdoc_crypto::{BLOCK_SIZE, CipherError, Sm4Cbc};

#[derive(Debug, Arbitrary)]
struct Input {
    key: [u8; 16],
    iv: [u8; 16],
    ciphertext: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let cipher = Sm4Cbc::new(&input.key, &input.iv);
    let len = input.ciphertext.len();

    match cipher.decrypt(&input.ciphertext) {
        Ok(plaintext) => {
            assert!(len.is_multiple_of(BLOCK_SIZE) && len > 0);
            assert!(plaintext.len() < len && plaintext.len() + BLOCK_SIZE >= len);
        },
        Err(CipherError::UnalignedLength { len: reported }) => {
            assert_eq!(reported, len);
            assert_ne!(len % BLOCK_SIZE, 0);
        },
        Err(CipherError::InvalidPadding) => assert_eq!(len % BLOCK_SIZE, 0),
    }
});
