//! Non-recursive encoder: `Value` → UBJSON bytes (`SPEC_FULL.md` §4.3).

mod config;

pub use config::{DefaultHandler, EncoderConfig};

use std::borrow::Cow;
use std::rc::Rc;

use crate::error::{EncoderError, EncoderErrorKind, PathComponent};
use crate::io::{ByteSink, VecSink, WriterSink};
use crate::marker;
use crate::value::Value;

/// Encodes `value` to an in-memory byte vector.
///
/// # Examples
///
/// ```
/// use ubjson_codec::{encode_to_bytes, EncoderConfig, Value};
///
/// let bytes = encode_to_bytes(&Value::Int(5), &EncoderConfig::default()).unwrap();
/// assert_eq!(bytes, vec![b'i', 5]);
/// ```
///
/// # Errors
///
/// Returns [`EncoderError`] if `value` contains a shape the encoder cannot
/// represent and no `default_handler` resolves it.
pub fn encode_to_bytes(value: &Value, config: &EncoderConfig) -> Result<Vec<u8>, EncoderError> {
    let mut sink = VecSink::new();
    encode(value, config, &mut sink)?;
    Ok(sink.into_inner())
}

/// Encodes `value` directly to a [`std::io::Write`] transport.
///
/// # Errors
///
/// Returns [`EncoderError`] on an unrepresentable value or an I/O failure
/// from the underlying writer.
pub fn encode_to_stream<W: std::io::Write>(
    value: &Value,
    config: &EncoderConfig,
    writer: W,
) -> Result<(), EncoderError> {
    let mut sink = WriterSink::new(writer);
    encode(value, config, &mut sink)
}

/// Borrowed-or-substituted array elements, so a `default_handler`
/// substitution does not force cloning the whole surrounding document.
enum Items<'a> {
    Borrowed(&'a [Value]),
    Owned(Vec<Value>),
}

impl<'a> Items<'a> {
    fn get(&self, i: usize) -> Option<Cow<'a, Value>> {
        match self {
            Items::Borrowed(s) => s.get(i).map(Cow::Borrowed),
            Items::Owned(v) => v.get(i).cloned().map(Cow::Owned),
        }
    }

    fn len(&self) -> usize {
        match self {
            Items::Borrowed(s) => s.len(),
            Items::Owned(v) => v.len(),
        }
    }
}

enum Pairs<'a> {
    Borrowed(Vec<(Rc<str>, &'a Value)>),
    Owned(Vec<(Rc<str>, Value)>),
}

impl<'a> Pairs<'a> {
    fn get(&self, i: usize) -> Option<(Rc<str>, Cow<'a, Value>)> {
        match self {
            Pairs::Borrowed(v) => v.get(i).map(|(k, v)| (k.clone(), Cow::Borrowed(*v))),
            Pairs::Owned(v) => v
                .get(i)
                .map(|(k, v)| (k.clone(), Cow::Owned(v.clone()))),
        }
    }

    fn len(&self) -> usize {
        match self {
            Pairs::Borrowed(v) => v.len(),
            Pairs::Owned(v) => v.len(),
        }
    }
}

enum Frame<'a> {
    /// `base_len` is `path.len()` at the moment this container's own frame
    /// was pushed — i.e. the path already identifies the container itself.
    /// Each turn truncates back to it before descending into (or finishing)
    /// the next child, which is what keeps `path` in sync with the explicit
    /// stack instead of a real call stack doing it implicitly.
    Array { items: Items<'a>, index: usize, base_len: usize },
    Object { pairs: Pairs<'a>, index: usize, base_len: usize },
}

/// The core non-recursive traversal shared by both public entry points: an
/// explicit work stack of open containers plus a single "value about to be
/// written" slot, so nesting depth never costs a call-stack frame (`SPEC_FULL.md`
/// §5).
fn encode(root: &Value, config: &EncoderConfig, sink: &mut dyn ByteSink) -> Result<(), EncoderError> {
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut path: Vec<PathComponent> = Vec::new();
    let mut pending: Option<Cow<'_, Value>> = Some(Cow::Borrowed(root));

    loop {
        if let Some(value) = pending.take() {
            match write_value(value, &path, config, sink)? {
                WriteOutcome::Scalar => {}
                WriteOutcome::Array(items) => {
                    if items.len() == 0 {
                        write_empty_container(sink, config, true)?;
                    } else {
                        write_container_open(sink, config, items.len(), true)?;
                        let base_len = path.len();
                        stack.push(Frame::Array { items, index: 0, base_len });
                    }
                }
                WriteOutcome::Object(pairs) => {
                    if pairs.len() == 0 {
                        write_empty_container(sink, config, false)?;
                    } else {
                        write_container_open(sink, config, pairs.len(), false)?;
                        let base_len = path.len();
                        stack.push(Frame::Object { pairs, index: 0, base_len });
                    }
                }
            }
            continue;
        }

        let Some(frame) = stack.last_mut() else {
            break;
        };

        match frame {
            Frame::Array { items, index, base_len } => {
                path.truncate(*base_len);
                if let Some(item) = items.get(*index) {
                    path.push(PathComponent::Index(*index));
                    *index += 1;
                    pending = Some(item);
                } else {
                    if !config.container_count {
                        sink.write_u8(marker::ARRAY_END)?;
                    }
                    stack.pop();
                }
            }
            Frame::Object { pairs, index, base_len } => {
                path.truncate(*base_len);
                if let Some((key, value)) = pairs.get(*index) {
                    *index += 1;
                    write_key(sink, &key)?;
                    path.push(PathComponent::Key(key));
                    pending = Some(value);
                } else {
                    if !config.container_count {
                        sink.write_u8(marker::OBJECT_END)?;
                    }
                    stack.pop();
                }
            }
        }
    }

    sink.flush()
}

enum WriteOutcome<'a> {
    Scalar,
    Array(Items<'a>),
    Object(Pairs<'a>),
}

/// Writes one value's marker (and payload, for scalars), resolving
/// `Value::NoOp` through `default_handler` first. Containers are not
/// recursed into here — the caller pushes a [`Frame`] and lets the main
/// loop drive their children.
fn write_value<'a>(
    value: Cow<'a, Value>,
    path: &[PathComponent],
    config: &EncoderConfig,
    sink: &mut dyn ByteSink,
) -> Result<WriteOutcome<'a>, EncoderError> {
    if matches!(value.as_ref(), Value::NoOp) {
        return resolve_default(path, config, sink);
    }

    match value {
        Cow::Borrowed(Value::Array(items)) => Ok(WriteOutcome::Array(Items::Borrowed(items))),
        Cow::Owned(Value::Array(items)) => Ok(WriteOutcome::Array(Items::Owned(items))),
        Cow::Borrowed(Value::Object(pairs)) => {
            Ok(WriteOutcome::Object(order_pairs_borrowed(pairs, config)))
        }
        Cow::Owned(Value::Object(pairs)) => {
            Ok(WriteOutcome::Object(order_pairs_owned(pairs, config)))
        }
        Cow::Borrowed(scalar) => {
            write_scalar(scalar, path, config, sink)?;
            Ok(WriteOutcome::Scalar)
        }
        Cow::Owned(scalar) => {
            write_scalar(&scalar, path, config, sink)?;
            Ok(WriteOutcome::Scalar)
        }
    }
}

fn write_scalar(
    value: &Value,
    path: &[PathComponent],
    config: &EncoderConfig,
    sink: &mut dyn ByteSink,
) -> Result<(), EncoderError> {
    match value {
        Value::Null => sink.write_u8(marker::NULL)?,
        Value::Bool(true) => sink.write_u8(marker::TRUE)?,
        Value::Bool(false) => sink.write_u8(marker::FALSE)?,
        Value::Int(n) => encode_int(sink, *n)?,
        Value::Float(f) => encode_float(sink, *f, config.no_float32)?,
        Value::HugeInt(s) | Value::HighPrec(s) => {
            sink.write_u8(marker::HIGH_PRECISION)?;
            write_string(sink, s, path)?;
        }
        Value::Char(c) => {
            sink.write_u8(marker::CHAR)?;
            sink.write_u8((*c as u32 & 0x7F) as u8)?;
        }
        Value::String(s) => {
            sink.write_u8(marker::STRING)?;
            write_string(sink, s, path)?;
        }
        Value::Bytes(b) => encode_bytes(sink, b)?,
        Value::NoOp | Value::Array(_) | Value::Object(_) => unreachable!("handled by write_value"),
    }
    Ok(())
}

/// Tracks how many times `default_handler` has substituted in a row for the
/// current value; more than one substitution means the handler's own
/// output again needed the handler, which is `RecursionViaDefault` rather
/// than an infinite loop.
fn resolve_default<'a>(
    path: &[PathComponent],
    config: &EncoderConfig,
    sink: &mut dyn ByteSink,
) -> Result<WriteOutcome<'a>, EncoderError> {
    let Some(handler) = &config.default_handler else {
        return Err(EncoderError::new(
            EncoderErrorKind::UnsupportedType,
            path.to_vec(),
        ));
    };
    let Some(substitute) = handler(path) else {
        return Err(EncoderError::new(
            EncoderErrorKind::UnsupportedType,
            path.to_vec(),
        ));
    };
    if matches!(substitute, Value::NoOp) {
        return Err(EncoderError::new(
            EncoderErrorKind::RecursionViaDefault,
            path.to_vec(),
        ));
    }
    write_value(Cow::Owned(substitute), path, config, sink)
}

fn order_pairs_borrowed<'a>(pairs: &'a [(Rc<str>, Value)], config: &EncoderConfig) -> Pairs<'a> {
    let mut v: Vec<(Rc<str>, &'a Value)> = pairs.iter().map(|(k, val)| (k.clone(), val)).collect();
    if config.sort_keys {
        v.sort_by(|(a, _), (b, _)| a.cmp(b));
    }
    Pairs::Borrowed(v)
}

fn order_pairs_owned(mut pairs: Vec<(Rc<str>, Value)>, config: &EncoderConfig) -> Pairs<'static> {
    if config.sort_keys {
        pairs.sort_by(|(a, _), (b, _)| a.cmp(b));
    }
    Pairs::Owned(pairs)
}

fn write_container_open(
    sink: &mut dyn ByteSink,
    config: &EncoderConfig,
    len: usize,
    is_array: bool,
) -> Result<(), EncoderError> {
    sink.write_u8(if is_array { marker::ARRAY_START } else { marker::OBJECT_START })?;
    if config.container_count {
        sink.write_u8(marker::COUNT)?;
        #[allow(clippy::cast_possible_wrap)]
        encode_int(sink, len as i64)?;
    }
    Ok(())
}

/// An empty array/object has no elements to trigger the count prefix via
/// the main loop, so it is handled as a one-shot special case: the
/// counted form still needs `#0`, the default form still needs its closer.
fn write_empty_container(
    sink: &mut dyn ByteSink,
    config: &EncoderConfig,
    is_array: bool,
) -> Result<(), EncoderError> {
    write_container_open(sink, config, 0, is_array)?;
    if !config.container_count {
        sink.write_u8(if is_array { marker::ARRAY_END } else { marker::OBJECT_END })?;
    }
    Ok(())
}

fn encode_int(sink: &mut dyn ByteSink, v: i64) -> Result<(), EncoderError> {
    let m = marker::narrowest_int_marker(v);
    sink.write_u8(m)?;
    match m {
        marker::INT8 => sink.write_u8(v as i8 as u8),
        marker::UINT8 => sink.write_u8(v as u8),
        marker::INT16 => sink.write_bytes(&(v as i16).to_be_bytes()),
        marker::INT32 => sink.write_bytes(&(v as i32).to_be_bytes()),
        _ => sink.write_bytes(&v.to_be_bytes()),
    }
}

fn encode_float(sink: &mut dyn ByteSink, v: f64, no_float32: bool) -> Result<(), EncoderError> {
    if !v.is_finite() {
        return sink.write_u8(marker::NULL);
    }
    let m = marker::narrowest_float_marker(v, no_float32);
    sink.write_u8(m)?;
    if m == marker::FLOAT32 {
        #[allow(clippy::cast_possible_truncation)]
        sink.write_bytes(&(v as f32).to_be_bytes())
    } else {
        sink.write_bytes(&v.to_be_bytes())
    }
}

fn write_string(sink: &mut dyn ByteSink, s: &str, path: &[PathComponent]) -> Result<(), EncoderError> {
    let bytes = s.as_bytes();
    let len = i64::try_from(bytes.len())
        .map_err(|_| EncoderError::new(EncoderErrorKind::IntegerOutOfRange, path.to_vec()))?;
    encode_int(sink, len)?;
    sink.write_bytes(bytes)
}

/// Object keys are length-prefixed strings with no leading `S` marker.
fn write_key(sink: &mut dyn ByteSink, key: &str) -> Result<(), EncoderError> {
    let bytes = key.as_bytes();
    let len = i64::try_from(bytes.len()).map_err(|_| {
        EncoderError::new(EncoderErrorKind::IntegerOutOfRange, vec![PathComponent::Key(key.into())])
    })?;
    encode_int(sink, len)?;
    sink.write_bytes(bytes)
}

/// Writes a byte blob using the typed+counted fast path: `[$U#<len><bytes>`
/// (`SPEC_FULL.md` §4.1), the only container-typing the encoder ever emits.
fn encode_bytes(sink: &mut dyn ByteSink, b: &[u8]) -> Result<(), EncoderError> {
    sink.write_u8(marker::ARRAY_START)?;
    sink.write_u8(marker::TYPE)?;
    sink.write_u8(marker::UINT8)?;
    sink.write_u8(marker::COUNT)?;
    let len = i64::try_from(b.len())
        .map_err(|_| EncoderError::new(EncoderErrorKind::IntegerOutOfRange, Vec::new()))?;
    encode_int(sink, len)?;
    sink.write_bytes(b)
}
