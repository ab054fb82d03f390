//! SM4 block cipher (GB/T 32907-2016) in CBC mode
//!
//! # Structure
//!
//! ```text
//! key (16 bytes) ──► key schedule ──► 32 round keys ──► Sm4 (single block)
//!                                                          │
//!                                      iv (16 bytes) ──► Sm4Cbc (PKCS#7 + chaining)
//! ```
//!
//! The block transform is a 32-round unbalanced Feistel network. Decryption
//! runs the same rounds with the round keys reversed; there is no inverse
//! S-box.

pub mod cbc;
pub mod error;
pub mod padding;
mod block;
mod tables;

pub use block::Sm4;
pub use cbc::Sm4Cbc;
pub use error::CipherError;

/// Block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Key size in bytes.
pub const KEY_SIZE: usize = 16;

/// Number of rounds (and round keys).
pub const ROUNDS: usize = 32;
