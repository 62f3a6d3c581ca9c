//! The universal testable properties from `SPEC_FULL.md` §8 that exercise
//! the public API directly (round-trip and key interning live elsewhere:
//! round-trip needs `Value`'s `Arbitrary` impl, only visible to this crate's
//! own `cargo test`, see `src/tests/properties.rs`; key interning and
//! trailing-bytes safety are covered in `config_options.rs`).

use ubjson_codec::{decode_from_bytes, encode_to_bytes, DecoderConfig, EncoderConfig, Value};

/// Property 2: the marker selected for every integer matches the narrowing
/// precedence in `SPEC_FULL.md` §4.1 exactly. One generated `#[test]` per
/// boundary value, rather than a loop over a table, so a regression names
/// the exact failing case in its test name.
macro_rules! narrowest_marker_case {
    ($name:ident, $value:expr, $marker:expr) => {
        paste::paste! {
            #[test]
            fn [<narrowest_marker_ $name>]() {
                let bytes = encode_to_bytes(&Value::Int($value), &EncoderConfig::default()).unwrap();
                assert_eq!(bytes[0], $marker, "value {} got marker {:#X}", $value, bytes[0]);
            }
        }
    };
}

narrowest_marker_case!(int8_zero, 0i64, b'i');
narrowest_marker_case!(int8_min, -128i64, b'i');
narrowest_marker_case!(int8_max, 127i64, b'i');
narrowest_marker_case!(uint8_min, 128i64, b'U');
narrowest_marker_case!(uint8_max, 255i64, b'U');
narrowest_marker_case!(int16_min_boundary, 256i64, b'I');
narrowest_marker_case!(int16_below_int8, -129i64, b'I');
narrowest_marker_case!(int16_max, 32767i64, b'I');
narrowest_marker_case!(int32_min_boundary, 32768i64, b'l');
narrowest_marker_case!(int32_below_int16, -32769i64, b'l');
narrowest_marker_case!(int32_max, i64::from(i32::MAX), b'l');
narrowest_marker_case!(int64_min_boundary, i64::from(i32::MAX) + 1, b'L');
narrowest_marker_case!(int64_below_int32, i64::from(i32::MIN) - 1, b'L');
narrowest_marker_case!(int64_max, i64::MAX, b'L');
narrowest_marker_case!(int64_min, i64::MIN, b'L');

/// Destroys a decoded `Value` without recursing through Rust's derived
/// `Drop` glue, which would itself blow the stack on a document nested as
/// deep as the one this test decodes — exactly the failure mode the
/// non-recursive codec exists to avoid on the *parsing* side.
fn drop_iteratively(root: Value) {
    let mut stack = vec![root];
    while let Some(value) = stack.pop() {
        match value {
            Value::Array(items) => stack.extend(items),
            Value::Object(pairs) => stack.extend(pairs.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
}

fn nested_array_bytes(depth: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(depth * 2 + 2);
    bytes.resize(depth, b'[');
    bytes.push(b'i');
    bytes.push(0);
    bytes.resize(bytes.len() + depth, b']');
    bytes
}

/// Property 3: depth is bounded by `max_depth` and the heap, not the call
/// stack. Runs the codec on a thread with the 1 MiB stack the spec names as
/// the reference platform, at the depth (10^4) it names as the bar.
#[test]
fn depth_independence_at_ten_thousand() {
    const DEPTH: usize = 10_000;
    let handle = std::thread::Builder::new()
        .stack_size(1024 * 1024)
        .spawn(|| {
            let bytes = nested_array_bytes(DEPTH);
            let config = DecoderConfig { max_depth: DEPTH + 1, ..DecoderConfig::default() };
            let (value, consumed) = decode_from_bytes(&bytes, &config).expect("depth within max_depth");
            assert_eq!(consumed, bytes.len());

            let re_encoded = encode_to_bytes(&value, &EncoderConfig::default()).expect("re-encodes");
            assert_eq!(re_encoded, bytes);

            drop_iteratively(value);
        })
        .expect("spawn a 1 MiB-stack thread");
    handle.join().expect("depth-10000 traversal must not overflow a 1 MiB stack");
}
