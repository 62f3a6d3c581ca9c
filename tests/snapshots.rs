//! Byte-for-byte snapshots of the encoder scenarios (`SPEC_FULL.md` §8,
//! E1-E5), in the teacher's `insta` inline-snapshot style.

use ubjson_codec::{encode_to_bytes, EncoderConfig, Value};

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect::<Vec<_>>().join(" ")
}

#[test]
fn snapshot_encoder_scenarios() {
    let int_zero = encode_to_bytes(&Value::Int(0), &EncoderConfig::default()).unwrap();
    insta::assert_snapshot!(to_hex(&int_zero), @"69 00");

    let int_uint8_max = encode_to_bytes(&Value::Int(255), &EncoderConfig::default()).unwrap();
    insta::assert_snapshot!(to_hex(&int_uint8_max), @"55 FF");

    let int_needs_i32 = encode_to_bytes(&Value::Int(65535), &EncoderConfig::default()).unwrap();
    insta::assert_snapshot!(to_hex(&int_needs_i32), @"6C 00 00 FF FF");

    let object_insertion_order = encode_to_bytes(
        &Value::Object(vec![("a".into(), Value::Int(1)), ("b".into(), Value::Int(2))]),
        &EncoderConfig::default(),
    )
    .unwrap();
    insta::assert_snapshot!(to_hex(&object_insertion_order), @"7B 69 01 61 69 01 69 01 62 69 02 7D");

    let bytes = encode_to_bytes(&Value::Bytes(vec![1u8, 2].into()), &EncoderConfig::default()).unwrap();
    insta::assert_snapshot!(to_hex(&bytes), @"5B 24 55 23 69 02 01 02");
}
