use std::rc::Rc;

use crate::error::PathComponent;
use crate::value::Value;

/// Called for any value the encoder does not natively recognise (only
/// [`crate::value::Value::NoOp`], see `SPEC_FULL.md` §4.3). Returning `None`
/// raises `UnsupportedType`; returning `Some(v)` substitutes `v` for the
/// offending value, unless `v` itself needs the handler again, which raises
/// `RecursionViaDefault` instead of looping.
pub type DefaultHandler = Rc<dyn Fn(&[PathComponent]) -> Option<Value>>;

/// Options controlling how [`super::encode_to_bytes`]/`encode_to_stream`
/// traverse and serialize a [`Value`].
#[derive(Clone, Default)]
pub struct EncoderConfig {
    /// Invoked for values the encoder cannot natively express. `None` by
    /// default, in which case such a value raises `UnsupportedType`.
    pub default_handler: Option<DefaultHandler>,
    /// Emit object keys in sorted order rather than insertion order.
    pub sort_keys: bool,
    /// Forbid narrowing a float to `d` (binary32) even when it round-trips
    /// exactly; every float is written as `D` (binary64).
    pub no_float32: bool,
    /// Always emit array/object lengths via the counted-container form
    /// (`#<len>`) instead of the default open/close-marker form.
    pub container_count: bool,
}

impl std::fmt::Debug for EncoderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderConfig")
            .field("default_handler", &self.default_handler.is_some())
            .field("sort_keys", &self.sort_keys)
            .field("no_float32", &self.no_float32)
            .field("container_count", &self.container_count)
            .finish()
    }
}
