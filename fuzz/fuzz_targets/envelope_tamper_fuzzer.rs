//! Fuzz target for tamper detection
//!
//! Seals a document, mutates the envelope, and checks the codec notices.
//!
//! # Strategy
//!
//! - Flip: XOR one byte anywhere in the envelope
//! - Truncate: drop bytes from the end
//! - Extend: append arbitrary bytes
//! - Splice: overwrite a range with arbitrary bytes
//!
//! # Invariants
//!
//! - A mutated envelope never opens to different content
//! - A flip inside the tag is always `NotManagedFile`
//! - A flip inside the digest is always `TamperedDigest`
//! - NEVER panic

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sealdoc_core::{EnvelopeCodec, EnvelopeConfig, EnvelopeError, MAGIC_TAG};

#[derive(Debug, Clone, Arbitrary)]
struct Input {
    key: [u8; 16],
    iv: [u8; 16],
    text: String,
    mutation: Mutation,
}

#[derive(Debug, Clone, Arbitrary)]
enum Mutation {
    Flip { offset: usize, mask: u8 },
    Truncate { keep: usize },
    Extend { bytes: Vec<u8> },
    Splice { offset: usize, bytes: Vec<u8> },
}

fuzz_target!(|input: Input| {
    let codec = EnvelopeCodec::new(&EnvelopeConfig::new(input.key, input.iv));
    let original = codec.seal(input.text.as_bytes());
    let mut sealed = original.clone();

    match input.mutation {
        Mutation::Flip { offset, mask } => {
            let mask = mask.max(1);
            let offset = offset % sealed.len();
            sealed[offset] ^= mask;

            let result = codec.open(&sealed);
            if offset < MAGIC_TAG.len() {
                assert_eq!(result, Err(EnvelopeError::NotManagedFile));
            } else if offset >= sealed.len() - 32 {
                assert_eq!(result, Err(EnvelopeError::TamperedDigest));
            } else {
                assert!(result.is_err(), "ciphertext flip at {offset} was accepted");
            }
        },
        Mutation::Truncate { keep } => {
            sealed.truncate(keep % sealed.len());
            assert!(codec.open(&sealed).is_err());
        },
        Mutation::Extend { bytes } => {
            sealed.extend_from_slice(&bytes);
            if !bytes.is_empty() {
                assert!(codec.open(&sealed).is_err());
            }
        },
        Mutation::Splice { offset, bytes } => {
            let offset = offset % sealed.len();
            let end = (offset + bytes.len()).min(sealed.len());
            sealed[offset..end].copy_from_slice(&bytes[..end - offset]);

            if sealed != original {
                assert_ne!(codec.open(&sealed).ok(), Some(input.text));
            }
        },
    }
});
