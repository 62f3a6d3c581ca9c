//! The UBJSON Draft-12 marker alphabet and the numeric classifier that picks
//! the narrowest marker for a given runtime value (`SPEC_FULL.md` §4.1).

pub const NULL: u8 = b'Z';
pub const NOOP: u8 = b'N';
pub const TRUE: u8 = b'T';
pub const FALSE: u8 = b'F';
pub const INT8: u8 = b'i';
pub const UINT8: u8 = b'U';
pub const INT16: u8 = b'I';
pub const INT32: u8 = b'l';
pub const INT64: u8 = b'L';
pub const FLOAT32: u8 = b'd';
pub const FLOAT64: u8 = b'D';
pub const HIGH_PRECISION: u8 = b'H';
pub const CHAR: u8 = b'C';
pub const STRING: u8 = b'S';
pub const ARRAY_START: u8 = b'[';
pub const ARRAY_END: u8 = b']';
pub const OBJECT_START: u8 = b'{';
pub const OBJECT_END: u8 = b'}';
pub const TYPE: u8 = b'$';
pub const COUNT: u8 = b'#';

/// Returns `true` if `m` is one of the five integer markers, i.e. a valid
/// length-prefix marker.
#[must_use]
pub fn is_int_marker(m: u8) -> bool {
    matches!(m, INT8 | UINT8 | INT16 | INT32 | INT64)
}

/// Chooses the narrowest integer marker for `v`, per the precedence in
/// `SPEC_FULL.md` §4.1: `i`, then `U`, then `I`, then `l`, then `L`. `Value::Int`
/// is always `i64`-bounded, so `L` is always a valid last resort and the `H`
/// fallback described in the spec is unreachable for this path (see
/// DESIGN.md).
#[must_use]
pub fn narrowest_int_marker(v: i64) -> u8 {
    if (-128..=127).contains(&v) {
        INT8
    } else if (0..=255).contains(&v) {
        UINT8
    } else if (-32768..=32767).contains(&v) {
        INT16
    } else if (i64::from(i32::MIN)..=i64::from(i32::MAX)).contains(&v) {
        INT32
    } else {
        INT64
    }
}

/// Size in bytes of the fixed-width payload following each integer marker.
#[must_use]
pub fn int_payload_len(marker: u8) -> usize {
    match marker {
        INT8 | UINT8 => 1,
        INT16 => 2,
        INT32 => 4,
        INT64 => 8,
        _ => 0,
    }
}

/// Chooses `d` (binary32) iff `v` is finite and round-trips exactly through
/// `f32`, and `no_float32` does not forbid it; otherwise `D` (binary64).
/// Non-finite floats are the caller's responsibility to have already mapped
/// to `Value::Null` (see the encoder's float rule).
#[must_use]
pub fn narrowest_float_marker(v: f64, no_float32: bool) -> u8 {
    if !no_float32 && f64::from(v as f32) == v {
        FLOAT32
    } else {
        FLOAT64
    }
}
