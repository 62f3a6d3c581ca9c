//! Encoder scenarios from `SPEC_FULL.md` §8: fixed `Value`s with known
//! encoded bytes.

#[path = "support.rs"]
mod support;
use support::hex;

use rstest::rstest;
use ubjson_codec::{encode_to_bytes, EncoderConfig, Value};

#[rstest]
#[case::int_zero(Value::Int(0), "69 00")]
#[case::int_uint8_max(Value::Int(255), "55 FF")]
#[case::int_needs_i32(Value::Int(65535), "6C 00 00 FF FF")]
#[case::object_insertion_order(
    Value::Object(vec![("a".into(), Value::Int(1)), ("b".into(), Value::Int(2))]),
    "7B 69 01 61 69 01 69 01 62 69 02 7D"
)]
#[case::bytes(Value::Bytes(vec![1u8, 2].into()), "5B 24 55 23 69 02 01 02")]
fn encoder_scenario(#[case] value: Value, #[case] expected_hex: &str) {
    let bytes = encode_to_bytes(&value, &EncoderConfig::default()).unwrap();
    assert_eq!(bytes, hex(expected_hex));
}
