//! Property-based tests for the envelope codec
//!
//! Every mutation of a sealed envelope must be rejected, and the rejection
//! must name the region that was touched:
//!
//! 1. **Round-trip**: open(seal(m)) == m for any text and key material
//! 2. **Tag**: any change to the magic tag is `NotManagedFile`
//! 3. **Ciphertext**: any change is `TamperedDecryption` or `TamperedDigest`
//! 4. **Digest**: any change is `TamperedDigest`
//! 5. **Truncation**: dropping bytes never yields a successful open

use proptest::prelude::*;
use sealdoc_core::{EnvelopeCodec, EnvelopeConfig, EnvelopeError, MAGIC_TAG, MIN_ENVELOPE_SIZE};

fn codec(key: [u8; 16], iv: [u8; 16]) -> EnvelopeCodec {
    EnvelopeCodec::new(&EnvelopeConfig::new(key, iv))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_roundtrip(
        key in any::<[u8; 16]>(),
        iv in any::<[u8; 16]>(),
        text in ".{0,200}",
    ) {
        let codec = codec(key, iv);
        let sealed = codec.seal(text.as_bytes());

        prop_assert!(sealed.starts_with(MAGIC_TAG));
        prop_assert_eq!((sealed.len() - MAGIC_TAG.len() - 32) % 16, 0);
        prop_assert_eq!(codec.open(&sealed), Ok(text));
    }

    #[test]
    fn prop_tag_flip_is_not_managed(
        text in ".{0,64}",
        index in 0..MAGIC_TAG.len(),
        mask in 1u8..=255,
    ) {
        let codec = EnvelopeCodec::new(&EnvelopeConfig::legacy());
        let mut sealed = codec.seal(text.as_bytes());
        sealed[index] ^= mask;

        prop_assert_eq!(codec.open(&sealed), Err(EnvelopeError::NotManagedFile));
    }

    #[test]
    fn prop_ciphertext_flip_is_tampering(
        text in ".{0,64}",
        offset in any::<prop::sample::Index>(),
        mask in 1u8..=255,
    ) {
        let codec = EnvelopeCodec::new(&EnvelopeConfig::legacy());
        let mut sealed = codec.seal(text.as_bytes());
        let ciphertext_len = sealed.len() - MAGIC_TAG.len() - 32;
        sealed[MAGIC_TAG.len() + offset.index(ciphertext_len)] ^= mask;

        let err = codec.open(&sealed).unwrap_err();
        prop_assert!(
            matches!(err, EnvelopeError::TamperedDecryption | EnvelopeError::TamperedDigest),
            "unexpected error: {:?}",
            err
        );
    }

    #[test]
    fn prop_digest_flip_is_hash_mismatch(
        text in ".{0,64}",
        index in 0usize..32,
        mask in 1u8..=255,
    ) {
        let codec = EnvelopeCodec::new(&EnvelopeConfig::legacy());
        let mut sealed = codec.seal(text.as_bytes());
        let digest_start = sealed.len() - 32;
        sealed[digest_start + index] ^= mask;

        prop_assert_eq!(codec.open(&sealed), Err(EnvelopeError::TamperedDigest));
    }

    #[test]
    fn prop_truncation_is_rejected(
        text in ".{0,64}",
        cut in any::<prop::sample::Index>(),
    ) {
        let codec = EnvelopeCodec::new(&EnvelopeConfig::legacy());
        let sealed = codec.seal(text.as_bytes());
        let truncated = &sealed[..cut.index(sealed.len())];

        let err = codec.open(truncated).unwrap_err();
        if truncated.len() < MAGIC_TAG.len() {
            prop_assert_eq!(err, EnvelopeError::NotManagedFile);
        } else if truncated.len() < MIN_ENVELOPE_SIZE {
            prop_assert_eq!(err, EnvelopeError::MalformedStructure { len: truncated.len(), min: MIN_ENVELOPE_SIZE });
        } else {
            prop_assert!(err.is_tampered(), "unexpected error: {:?}", err);
        }
    }

    #[test]
    fn prop_arbitrary_input_never_opens(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let codec = EnvelopeCodec::new(&EnvelopeConfig::legacy());
        prop_assert_eq!(codec.open(&data), Err(EnvelopeError::NotManagedFile));

        let mut tagged = MAGIC_TAG.to_vec();
        tagged.extend_from_slice(&data);
        prop_assert!(codec.open(&tagged).is_err());
    }
}

#[test]
fn legacy_hello_envelope_is_stable() {
    let sealed = EnvelopeCodec::new(&EnvelopeConfig::legacy()).seal(b"hello");

    insta::assert_snapshot!(
        hex::encode(&sealed),
        @"4e5055534543454e43303031e18344608a4f01652027510bf802cf14becbbfaae6548b8bf0cfcad5a27183cd1be6093b1cceccc303d9c61d0a645268"
    );
}

#[test]
fn appended_byte_is_rejected() {
    let codec = EnvelopeCodec::new(&EnvelopeConfig::legacy());
    let mut sealed = codec.seal(b"hello");
    sealed.push(0x00);

    assert_eq!(codec.open(&sealed), Err(EnvelopeError::TamperedDecryption));
}
