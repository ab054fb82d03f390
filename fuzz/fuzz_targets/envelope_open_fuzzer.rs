//! Fuzz target for EnvelopeCodec::open
//!
//! Feeds arbitrary bytes to the codec, both raw and behind a valid magic tag
//! so the fuzzer gets past the first check and reaches the length, decryption
//! and digest checks.
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sealdoc_core::{EnvelopeCodec, EnvelopeConfig, EnvelopeError, MAGIC_TAG};

fuzz_target!(|data: &[u8]| {
    let codec = EnvelopeCodec::new(&EnvelopeConfig::legacy());

    if !data.starts_with(MAGIC_TAG) {
        assert_eq!(codec.open(data), Err(EnvelopeError::NotManagedFile));
    }

    let mut tagged = MAGIC_TAG.to_vec();
    tagged.extend_from_slice(data);
    let _ = codec.open(&tagged);
});
