use quickcheck::QuickCheck;
use quickcheck_macros::quickcheck;

use crate::{decode_from_bytes, encode_to_bytes, DecoderConfig, EncoderConfig, Value};

/// Testable Property 1 (`SPEC_FULL.md` §8): every value the encoder accepts
/// round-trips through `decode(encode(v))`. `Value`'s `Arbitrary` impl never
/// generates non-finite floats or out-of-range `Char`s, so no declared lossy
/// mapping can fire here.
///
/// Driven by hand rather than `#[quickcheck]` so the case count can scale up
/// on CI, the way the teacher's own property tests do.
#[test]
fn round_trip() {
    fn prop(v: Value) -> bool {
        let bytes = encode_to_bytes(&v, &EncoderConfig::default()).expect("arbitrary Value always encodes");
        let (decoded, consumed) =
            decode_from_bytes(&bytes, &DecoderConfig::default()).expect("encoder output always decodes");
        consumed == bytes.len() && decoded == v
    }

    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    QuickCheck::new().tests(tests).quickcheck(prop as fn(Value) -> bool);
}

/// Same property under `container_count`, which reshapes the wire bytes (no
/// closing marker, a leading declared length) but must not change what
/// decodes back out.
#[quickcheck]
fn round_trip_container_count(v: Value) -> bool {
    let config = EncoderConfig { container_count: true, ..EncoderConfig::default() };
    let bytes = encode_to_bytes(&v, &config).expect("arbitrary Value always encodes");
    let (decoded, consumed) =
        decode_from_bytes(&bytes, &DecoderConfig::default()).expect("encoder output always decodes");
    consumed == bytes.len() && decoded == v
}
