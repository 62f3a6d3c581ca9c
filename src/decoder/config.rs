use std::rc::Rc;

use crate::value::{Object, Value};

/// How a fully-parsed object is handed back to the caller before it is
/// inserted into its parent container (`SPEC_FULL.md` §4.4).
#[derive(Clone)]
pub enum ObjectHook {
    /// No hook: the decoder produces `Value::Object` directly.
    None,
    /// Receives the object after duplicate keys have been resolved
    /// (last value wins, first occurrence's position kept).
    Object(Rc<dyn Fn(Object) -> Result<Value, String>>),
    /// Receives the raw `(key, value)` pairs in source order, duplicates
    /// and all, before any resolution is applied.
    Pairs(Rc<dyn Fn(Vec<(Rc<str>, Value)>) -> Result<Value, String>>),
}

impl Default for ObjectHook {
    fn default() -> Self {
        Self::None
    }
}

impl std::fmt::Debug for ObjectHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::None => "None",
            Self::Object(_) => "Object(..)",
            Self::Pairs(_) => "Pairs(..)",
        };
        f.write_str(label)
    }
}

/// Options controlling how [`super::decode_from_bytes`]/`decode_from_stream`
/// interpret the byte stream.
#[derive(Clone, Debug)]
pub struct DecoderConfig {
    pub object_hook: ObjectHook,
    /// Deduplicate equal object keys within a document to one `Rc<str>`
    /// allocation, so `Rc::ptr_eq` can confirm shared identity.
    pub intern_object_keys: bool,
    /// Reject the typed+counted `uint8` byte-blob fast path instead of
    /// decoding it to `Value::Bytes`; it is decoded as `Value::Array` of
    /// `Value::Int` instead, matching how an untyped array of `U` would
    /// decode.
    pub no_bytes: bool,
    /// Maximum container nesting depth; exceeding it raises `DepthExceeded`.
    pub max_depth: usize,
    /// Maximum element count accepted for any one counted container;
    /// exceeding it raises `LengthExceeded`.
    pub max_container_len: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            object_hook: ObjectHook::None,
            intern_object_keys: false,
            no_bytes: false,
            max_depth: 256,
            max_container_len: 16 * 1024 * 1024,
        }
    }
}
