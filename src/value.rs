//! The in-memory value model the codec converts to and from UBJSON bytes.
//!
//! [`Value`] is a tagged variant covering every case the wire format can
//! describe: scalars, the two "number that doesn't fit in a machine type"
//! escape hatches (`HugeInt`, `HighPrec`), an opaque byte blob, and ordered
//! sequences/mappings.
use std::fmt::{self, Write as _};
use std::rc::Rc;

use bstr::BString;

/// An ordered sequence of values.
pub type Array = Vec<Value>;

/// An ordered sequence of `(key, value)` pairs. Unlike a `BTreeMap`, this
/// preserves insertion order and tolerates duplicate keys on decode — both
/// of which the wire format permits (see `SPEC_FULL.md` §4.4).
pub type Object = Vec<(Rc<str>, Value)>;

/// A UBJSON value as defined by Draft-12.
///
/// # Examples
///
/// ```
/// use ubjson_codec::Value;
///
/// let v = Value::Array(vec![Value::Int(1), Value::String("hi".into())]);
/// assert!(v.is_array());
/// ```
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    /// Decode-only: filtered from arrays/objects unless the (pathological)
    /// explicitly-typed no-op container construction preserves it as `Null`.
    /// See `SPEC_FULL.md` §4.3 for the one case the encoder accepts it.
    NoOp,
    Bool(bool),
    /// Encoder narrows this to the smallest of `i`/`U`/`I`/`l`/`L` that fits.
    Int(i64),
    /// Arbitrary-precision decimal integer, stored as its canonical ASCII
    /// decimal text (optional leading `-`, no leading zeros other than a
    /// lone `0`). Constructing one with non-digit content is a caller bug;
    /// the encoder does not re-validate it.
    HugeInt(String),
    Float(f64),
    /// A decimal value that does not round-trip through `Float`, stored as
    /// its decimal text.
    HighPrec(String),
    /// A single ASCII code point, `U+0000..=U+007F`. A value outside that
    /// range is a caller bug (see [`Value::char_lossy`]); the encoder
    /// truncates to the low 7 bits rather than failing, since no encoder
    /// error kind in the design covers this and the `Value` invariants (see
    /// `SPEC_FULL.md` §3) already make it the caller's responsibility.
    Char(char),
    String(String),
    /// An opaque byte blob, written on the wire as a typed `uint8` array.
    Bytes(BString),
    Array(Array),
    Object(Object),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl Value {
    /// Builds a [`Value::Char`], truncating to the low 7 bits if `c` falls
    /// outside `U+0000..=U+007F` rather than failing (see the variant's
    /// docs for why).
    #[must_use]
    pub fn char_lossy(c: char) -> Self {
        let masked = (c as u32) & 0x7F;
        Self::Char(char::from_u32(masked).unwrap_or('\0'))
    }

    /// Returns `true` if the value is [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Value::Bool`].
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(..))
    }

    /// Returns `true` if the value is any of the numeric variants.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Self::Int(..) | Self::HugeInt(..) | Self::Float(..) | Self::HighPrec(..)
        )
    }

    /// Returns `true` if the value is [`Value::String`].
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Value::Array`].
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Value::Object`].
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }
}

fn write_escaped_string<W: fmt::Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            c if c.is_control() => write!(f, "\\u{:04X}", c as u32)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Renders a `Value` using JSON syntax, for debugging and error messages
/// only — this is not how the codec talks to the wire.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null | Value::NoOp => f.write_str("null"),
            Value::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Int(n) => write!(f, "{n}"),
            Value::HugeInt(s) | Value::HighPrec(s) => f.write_str(s),
            Value::Float(n) => write!(f, "{n}"),
            Value::Char(c) => write!(f, "\"{c}\""),
            Value::String(s) => {
                f.write_char('"')?;
                write_escaped_string(s, f)?;
                f.write_char('"')
            }
            Value::Bytes(b) => write!(f, "\"<{} bytes>\"", b.len()),
            Value::Array(arr) => {
                f.write_str("[")?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(obj) => {
                f.write_str("{")?;
                for (i, (k, v)) in obj.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_char('"')?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}
