//! Seed scenarios from `SPEC_FULL.md` §8: fixed hex inputs with known decoded
//! values.

#[path = "support.rs"]
mod support;
use support::hex;

use rstest::rstest;
use ubjson_codec::{decode_from_bytes, DecoderConfig, Value};

#[rstest]
#[case::null("5A", Value::Null)]
#[case::bool_true("54", Value::Bool(true))]
#[case::int8("69 2A", Value::Int(42))]
#[case::int16_negative("49 FF 9C", Value::Int(-100))]
#[case::string("53 69 05 68 65 6C 6C 6F", Value::String("hello".to_string()))]
#[case::array("5B 69 01 69 02 5D", Value::Array(vec![Value::Int(1), Value::Int(2)]))]
#[case::bytes_fast_path("5B 24 55 23 69 03 01 02 03", Value::Bytes(vec![1u8, 2, 3].into()))]
#[case::object("7B 69 01 61 69 01 7D", Value::Object(vec![("a".into(), Value::Int(1))]))]
fn seed_scenario(#[case] input: &str, #[case] expected: Value) {
    let bytes = hex(input);
    let (value, consumed) = decode_from_bytes(&bytes, &DecoderConfig::default()).unwrap();
    assert_eq!(value, expected);
    assert_eq!(consumed, bytes.len());
}
