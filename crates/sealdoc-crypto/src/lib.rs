//! Sealdoc Cryptographic Primitives
//!
//! The two symmetric building blocks behind the sealdoc envelope format, both
//! implemented from the published national standards:
//!
//! - [`sm3`]: 256-bit hash (GB/T 32905-2016)
//! - [`sm4`]: 128-bit block cipher (GB/T 32907-2016) with CBC chaining and
//!   PKCS#7 padding
//!
//! All operations are pure functions over in-memory buffers. There is no
//! streaming API and no shared mutable state: constant tables are `const`
//! items and every engine instance is owned by its caller.
//!
//! # Data Flow
//!
//! ```text
//! plaintext ──┬──► SM3 ───────────────► Digest (32 bytes)
//!             │
//!             └──► PKCS#7 pad ──► SM4-CBC(key, iv) ──► ciphertext (16n bytes)
//! ```
//!
//! # Security
//!
//! - Not constant-time: table lookups in the S-box leak through cache timing.
//! - CBC provides confidentiality only. Integrity comes from the separate SM3
//!   digest checked by the envelope layer.
//! - Round keys are zeroized when an [`Sm4`] instance is dropped.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod sm3;
pub mod sm4;
mod traits;

pub use sm3::{DIGEST_SIZE, Digest, Sm3};
pub use sm4::{BLOCK_SIZE, CipherError, KEY_SIZE, Sm4, Sm4Cbc};
pub use traits::{Cipher, Hasher};
