//! Non-recursive decoder: UBJSON bytes → `Value` (`SPEC_FULL.md` §4.4).

mod config;

pub use config::{DecoderConfig, ObjectHook};

use std::collections::HashMap;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::{DecoderError, DecoderErrorKind};
use crate::io::{ByteSource, ReaderSource, SliceSource};
use crate::marker;
use crate::value::{Object, Value};

/// Decodes a single value from `bytes`, returning it together with the
/// number of bytes consumed — any remainder is the caller's to interpret
/// (Testable Property 4 in `SPEC_FULL.md` §8).
///
/// # Examples
///
/// ```
/// use ubjson_codec::{decode_from_bytes, DecoderConfig, Value};
///
/// let (value, consumed) = decode_from_bytes(&[b'i', 5], &DecoderConfig::default()).unwrap();
/// assert_eq!(value, Value::Int(5));
/// assert_eq!(consumed, 2);
/// ```
///
/// # Errors
///
/// Returns [`DecoderError`] on truncated input, an unrecognised marker, a
/// malformed container, or a nesting/length limit violation.
pub fn decode_from_bytes(bytes: &[u8], config: &DecoderConfig) -> Result<(Value, usize), DecoderError> {
    let mut source = SliceSource::new(bytes);
    let value = decode(&mut source, config)?;
    Ok((value, source.bytes_consumed()))
}

/// Decodes a single value from a [`std::io::Read`] transport, consuming
/// exactly the bytes that make up that value and no more.
///
/// # Errors
///
/// Returns [`DecoderError`] under the same conditions as
/// [`decode_from_bytes`], plus I/O failures from the underlying reader.
pub fn decode_from_stream<R: std::io::Read>(reader: R, config: &DecoderConfig) -> Result<Value, DecoderError> {
    let mut source = ReaderSource::new(reader);
    decode(&mut source, config)
}

/// One value produced by a single marker read: either a finished scalar, or
/// the start of a container whose children the main loop will drive.
enum Decoded {
    Scalar(Value),
    Array(Frame),
    Object(Frame),
}

enum Frame {
    Array {
        items: Vec<Value>,
        /// `Some(n)`: counted container, `n` elements left, no closer byte.
        /// `None`: untyped/uncounted, watch for `]`.
        remaining: Option<usize>,
        /// `Some(marker)` for a typed container: every element reuses this
        /// marker instead of reading its own.
        inner_type: Option<u8>,
        /// One marker byte already consumed while parsing the container
        /// header (to tell `$`/`#`/closer apart from a first element) and
        /// not yet fed to an element read. Cleared after its first use.
        pending_marker: Option<u8>,
    },
    Object {
        pairs: Vec<(Rc<str>, Value)>,
        remaining: Option<usize>,
        inner_type: Option<u8>,
        pending_marker: Option<u8>,
        /// Set once this pair's key has been read and we're waiting for
        /// its value.
        pending_key: Option<Rc<str>>,
    },
}

/// The core non-recursive traversal: an explicit parse stack of open
/// containers, so nesting depth never costs a call-stack frame (`SPEC_FULL.md`
/// §5). `max_depth` bounds the stack itself, making depth-independence
/// (Testable Property 3) a constant-space guarantee rather than an
/// accident of available call-stack.
fn decode(source: &mut dyn ByteSource, config: &DecoderConfig) -> Result<Value, DecoderError> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;
    let mut interner: Option<HashMap<Rc<str>, Rc<str>>> =
        config.intern_object_keys.then(HashMap::new);

    /// What the next turn of the loop must do, resolved from the top
    /// frame's current state without holding a borrow of `stack` across
    /// the I/O and placement that follow — the two can't overlap, since
    /// both need a mutable borrow of the stack.
    enum Action {
        ArrayElement { forced: Option<u8>, inner_type: Option<u8> },
        FinishArray,
        ObjectKey { forced: Option<u8> },
        ObjectValue { inner_type: Option<u8> },
        FinishObject,
    }

    loop {
        if stack.is_empty() {
            if root.is_some() {
                break;
            }
            let decoded = read_value(source, config, None, false)?;
            place(decoded, &mut stack, &mut root, source, config)?;
            continue;
        }

        let action = match stack.last_mut().expect("checked non-empty above") {
            Frame::Array { remaining, inner_type, pending_marker, .. } => {
                let forced = pending_marker.take();
                match remaining {
                    Some(0) => Action::FinishArray,
                    Some(r) => {
                        *r -= 1;
                        Action::ArrayElement { forced, inner_type: *inner_type }
                    }
                    None => {
                        let b = match forced {
                            Some(b) => b,
                            None => source.read_u8()?,
                        };
                        // `forced` and a freshly read byte are both consumed
                        // exactly once with no intervening reads, so in
                        // either case the byte's own offset is one behind
                        // the source's current position.
                        let b_offset = source.offset() - 1;
                        if b == marker::ARRAY_END {
                            Action::FinishArray
                        } else if b == marker::OBJECT_END {
                            return Err(DecoderError::new(DecoderErrorKind::ContainerMismatch, b_offset));
                        } else {
                            Action::ArrayElement { forced: Some(b), inner_type: None }
                        }
                    }
                }
            }
            Frame::Object { remaining, inner_type, pending_marker, pending_key } => {
                if pending_key.is_some() {
                    Action::ObjectValue { inner_type: *inner_type }
                } else {
                    let forced = pending_marker.take();
                    match remaining {
                        Some(0) => Action::FinishObject,
                        Some(r) => {
                            *r -= 1;
                            Action::ObjectKey { forced }
                        }
                        None => {
                            let b = match forced {
                                Some(b) => b,
                                None => source.read_u8()?,
                            };
                            let b_offset = source.offset() - 1;
                            if b == marker::OBJECT_END {
                                Action::FinishObject
                            } else if b == marker::ARRAY_END {
                                return Err(DecoderError::new(DecoderErrorKind::ContainerMismatch, b_offset));
                            } else {
                                Action::ObjectKey { forced: Some(b) }
                            }
                        }
                    }
                }
            }
        };

        match action {
            Action::FinishArray => finish_array(&mut stack, &mut root, source, config)?,
            Action::FinishObject => finish_object(&mut stack, &mut root, source, config)?,
            Action::ArrayElement { forced, inner_type } => {
                let reused = forced.is_none() && inner_type.is_some();
                let decoded = read_value(source, config, forced.or(inner_type), reused)?;
                place(decoded, &mut stack, &mut root, source, config)?;
            }
            Action::ObjectValue { inner_type } => {
                let decoded = read_value(source, config, inner_type, inner_type.is_some())?;
                place(decoded, &mut stack, &mut root, source, config)?;
            }
            Action::ObjectKey { forced } => {
                let key = read_key(source, &mut interner, forced)?;
                if let Some(Frame::Object { pending_key, .. }) = stack.last_mut() {
                    *pending_key = Some(key);
                }
            }
        }
    }

    Ok(root.expect("loop only exits once root is set"))
}

/// Both routes into `Action::FinishArray` have already consumed whatever
/// closer byte there was to consume: a counted container never has one
/// (`remaining == Some(0)`), and an untyped container's `]` was read by the
/// main loop while it was deciding this was the closing byte rather than an
/// element marker. Nothing left to read here.
fn finish_array(
    stack: &mut Vec<Frame>,
    root: &mut Option<Value>,
    source: &mut dyn ByteSource,
    config: &DecoderConfig,
) -> Result<(), DecoderError> {
    let Some(Frame::Array { items, .. }) = stack.pop() else {
        unreachable!("finish_array called on non-array frame")
    };
    place(Decoded::Scalar(Value::Array(items)), stack, root, source, config)
}

fn finish_object(
    stack: &mut Vec<Frame>,
    root: &mut Option<Value>,
    source: &mut dyn ByteSource,
    config: &DecoderConfig,
) -> Result<(), DecoderError> {
    let Some(Frame::Object { pairs, .. }) = stack.pop() else {
        unreachable!()
    };
    let value = finalize_object(pairs, config, source.offset())?;
    place(Decoded::Scalar(value), stack, root, source, config)
}

/// Inserts a freshly decoded value into whatever slot is waiting for it —
/// the root, the current array's next element, or the current object's
/// pending value — or pushes a new container frame to be filled by
/// subsequent turns.
fn place(
    decoded: Decoded,
    stack: &mut Vec<Frame>,
    root: &mut Option<Value>,
    source: &mut dyn ByteSource,
    config: &DecoderConfig,
) -> Result<(), DecoderError> {
    match decoded {
        Decoded::Array(frame) | Decoded::Object(frame) => {
            if stack.len() >= config.max_depth {
                return Err(DecoderError::new(
                    DecoderErrorKind::DepthExceeded(config.max_depth),
                    source.offset(),
                ));
            }
            stack.push(frame);
            Ok(())
        }
        Decoded::Scalar(value) => {
            // `NoOp` reached here only from an untyped position (a typed
            // `N` container already became `Value::Null` in `read_value`)
            // and is padding: it contributes nothing to its container.
            if matches!(value, Value::NoOp) {
                return Ok(());
            }
            match stack.last_mut() {
                None => {
                    *root = Some(value);
                }
                Some(Frame::Array { items, .. }) => items.push(value),
                Some(Frame::Object { pending_key, pairs, .. }) => {
                    let key = pending_key.take().expect("value only requested after key read");
                    pairs.push((key, value));
                }
            }
            Ok(())
        }
    }
}

fn finalize_object(
    pairs: Vec<(Rc<str>, Value)>,
    config: &DecoderConfig,
    offset: u64,
) -> Result<Value, DecoderError> {
    match &config.object_hook {
        ObjectHook::Pairs(hook) => hook(pairs)
            .map_err(|e| DecoderError::new(DecoderErrorKind::HookRaised(e), offset)),
        ObjectHook::None => Ok(Value::Object(dedup_pairs(pairs))),
        ObjectHook::Object(hook) => {
            hook(dedup_pairs(pairs)).map_err(|e| DecoderError::new(DecoderErrorKind::HookRaised(e), offset))
        }
    }
}

/// Resolves duplicate keys last-value-wins, keeping each key's first
/// occurrence position (Testable Property — duplicate key handling,
/// `SPEC_FULL.md` §4.4).
fn dedup_pairs(pairs: Vec<(Rc<str>, Value)>) -> Object {
    let mut order: Vec<Rc<str>> = Vec::new();
    let mut last: HashMap<Rc<str>, Value> = HashMap::new();
    for (k, v) in pairs {
        if !last.contains_key(&k) {
            order.push(k.clone());
        }
        last.insert(k, v);
    }
    order
        .into_iter()
        .map(|k| {
            let v = last.remove(&k).expect("key was just inserted");
            (k, v)
        })
        .collect()
}

/// Reads one value. If `forced_marker` is `Some`, it is used as the type
/// marker instead of reading a fresh byte — either because the caller
/// already peeked it (closer-vs-element disambiguation) or because it is a
/// typed container's shared `inner_type`. `reused_from_type` distinguishes
/// those two origins for the one case where it matters: `N` read as an
/// actual marker byte is padding (`Value::NoOp`, filtered by [`place`]);
/// `N` reused as a stored `inner_type` has no payload to skip over and
/// must still contribute exactly one element, so it decodes to
/// `Value::Null` instead.
fn read_value(
    source: &mut dyn ByteSource,
    config: &DecoderConfig,
    forced_marker: Option<u8>,
    reused_from_type: bool,
) -> Result<Decoded, DecoderError> {
    let start_offset = source.offset();
    let m = match forced_marker {
        Some(m) => m,
        None => source.read_u8()?,
    };
    match m {
        marker::NULL => Ok(Decoded::Scalar(Value::Null)),
        marker::NOOP => {
            if reused_from_type {
                Ok(Decoded::Scalar(Value::Null))
            } else {
                Ok(Decoded::Scalar(Value::NoOp))
            }
        }
        marker::TRUE => Ok(Decoded::Scalar(Value::Bool(true))),
        marker::FALSE => Ok(Decoded::Scalar(Value::Bool(false))),
        _ if marker::is_int_marker(m) => Ok(Decoded::Scalar(Value::Int(read_int_payload(source, m)?))),
        marker::FLOAT32 => {
            let buf = source.read_exact(4)?;
            let bits = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
            Ok(Decoded::Scalar(Value::Float(f64::from(f32::from_bits(bits)))))
        }
        marker::FLOAT64 => {
            let buf = source.read_exact(8)?;
            let mut bits = [0u8; 8];
            bits.copy_from_slice(&buf);
            Ok(Decoded::Scalar(Value::Float(f64::from_bits(u64::from_be_bytes(bits)))))
        }
        marker::HIGH_PRECISION => {
            let s = read_length_prefixed_string(source, None)?;
            Ok(Decoded::Scalar(classify_high_precision(s)))
        }
        marker::CHAR => {
            let b = source.read_u8()?;
            if b >= 0x80 {
                return Err(DecoderError::new(DecoderErrorKind::BadUtf8, start_offset));
            }
            Ok(Decoded::Scalar(Value::Char(char::from(b))))
        }
        marker::STRING => {
            let s = read_length_prefixed_string(source, None)?;
            Ok(Decoded::Scalar(Value::String(s)))
        }
        marker::ARRAY_START => start_array(source, config),
        marker::OBJECT_START => start_object(source, config),
        other => Err(DecoderError::new(DecoderErrorKind::UnknownMarker(other), start_offset)),
    }
}

/// Parses everything between `[` and the first element/closer: the
/// optional `$<marker>#<len>` typed-and-counted header, the `#<len>`
/// counted-untyped header, or neither (untyped, uncounted). The byte that
/// disambiguates the untyped/uncounted case from an empty array is
/// unavoidably consumed while checking for `$`/`#`, so it is threaded
/// through as the new frame's `pending_marker` for the main loop's first
/// turn instead of being discarded.
fn start_array(source: &mut dyn ByteSource, config: &DecoderConfig) -> Result<Decoded, DecoderError> {
    let b = source.read_u8()?;
    if b == marker::TYPE {
        let inner = source.read_u8()?;
        let hash = source.read_u8()?;
        if hash != marker::COUNT {
            return Err(DecoderError::new(DecoderErrorKind::InvalidTypedContainer, source.offset()));
        }
        let len = read_count(source, config)?;
        if inner == marker::UINT8 && !config.no_bytes {
            let bytes = source.read_exact(len)?;
            return Ok(Decoded::Scalar(Value::Bytes(bytes.into())));
        }
        return Ok(Decoded::Array(Frame::Array {
            items: Vec::with_capacity(len.min(1024)),
            remaining: Some(len),
            inner_type: Some(inner),
            pending_marker: None,
        }));
    }
    if b == marker::COUNT {
        let len = read_count(source, config)?;
        return Ok(Decoded::Array(Frame::Array {
            items: Vec::with_capacity(len.min(1024)),
            remaining: Some(len),
            inner_type: None,
            pending_marker: None,
        }));
    }
    if b == marker::ARRAY_END {
        return Ok(Decoded::Scalar(Value::Array(Vec::new())));
    }
    Ok(Decoded::Array(Frame::Array {
        items: Vec::new(),
        remaining: None,
        inner_type: None,
        pending_marker: Some(b),
    }))
}

fn start_object(source: &mut dyn ByteSource, config: &DecoderConfig) -> Result<Decoded, DecoderError> {
    let b = source.read_u8()?;
    if b == marker::TYPE {
        let inner = source.read_u8()?;
        let hash = source.read_u8()?;
        if hash != marker::COUNT {
            return Err(DecoderError::new(DecoderErrorKind::InvalidTypedContainer, source.offset()));
        }
        let len = read_count(source, config)?;
        return Ok(Decoded::Object(Frame::Object {
            pairs: Vec::with_capacity(len.min(1024)),
            remaining: Some(len),
            inner_type: Some(inner),
            pending_marker: None,
            pending_key: None,
        }));
    }
    if b == marker::COUNT {
        let len = read_count(source, config)?;
        return Ok(Decoded::Object(Frame::Object {
            pairs: Vec::with_capacity(len.min(1024)),
            remaining: Some(len),
            inner_type: None,
            pending_marker: None,
            pending_key: None,
        }));
    }
    if b == marker::OBJECT_END {
        return Ok(Decoded::Scalar(Value::Object(Vec::new())));
    }
    Ok(Decoded::Object(Frame::Object {
        pairs: Vec::new(),
        remaining: None,
        inner_type: None,
        pending_marker: Some(b),
        pending_key: None,
    }))
}

fn read_count(source: &mut dyn ByteSource, config: &DecoderConfig) -> Result<usize, DecoderError> {
    let m = source.read_u8()?;
    if !marker::is_int_marker(m) {
        return Err(DecoderError::new(DecoderErrorKind::UnknownMarker(m), source.offset()));
    }
    let n = read_int_payload(source, m)?;
    let len = usize::try_from(n).map_err(|_| DecoderError::new(DecoderErrorKind::NegativeLength, source.offset()))?;
    if len > config.max_container_len {
        return Err(DecoderError::new(
            DecoderErrorKind::LengthExceeded(config.max_container_len),
            source.offset(),
        ));
    }
    Ok(len)
}

fn read_int_payload(source: &mut dyn ByteSource, m: u8) -> Result<i64, DecoderError> {
    match m {
        marker::INT8 => Ok(i64::from(source.read_u8()? as i8)),
        marker::UINT8 => Ok(i64::from(source.read_u8()?)),
        marker::INT16 => {
            let b = source.read_exact(2)?;
            Ok(i64::from(i16::from_be_bytes([b[0], b[1]])))
        }
        marker::INT32 => {
            let b = source.read_exact(4)?;
            Ok(i64::from(i32::from_be_bytes([b[0], b[1], b[2], b[3]])))
        }
        _ => {
            let b = source.read_exact(8)?;
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&b);
            Ok(i64::from_be_bytes(buf))
        }
    }
}

fn read_length_prefixed_string(
    source: &mut dyn ByteSource,
    forced_marker: Option<u8>,
) -> Result<String, DecoderError> {
    let m = match forced_marker {
        Some(m) => m,
        None => source.read_u8()?,
    };
    if !marker::is_int_marker(m) {
        return Err(DecoderError::new(DecoderErrorKind::UnknownMarker(m), source.offset()));
    }
    let n = read_int_payload(source, m)?;
    let len = usize::try_from(n).map_err(|_| DecoderError::new(DecoderErrorKind::NegativeLength, source.offset()))?;
    let bytes = source.read_exact(len)?;
    String::from_utf8(bytes).map_err(|_| DecoderError::new(DecoderErrorKind::BadUtf8, source.offset()))
}

fn read_key(
    source: &mut dyn ByteSource,
    interner: &mut Option<HashMap<Rc<str>, Rc<str>>>,
    forced_marker: Option<u8>,
) -> Result<Rc<str>, DecoderError> {
    let s = read_length_prefixed_string(source, forced_marker)?;
    let candidate: Rc<str> = s.into();
    let Some(map) = interner else {
        return Ok(candidate);
    };
    if let Some(existing) = map.get(&candidate) {
        return Ok(existing.clone());
    }
    map.insert(candidate.clone(), candidate.clone());
    Ok(candidate)
}

/// `H` (high-precision) payloads don't distinguish integer-valued decimals
/// from the rest on the wire; the shape of the decimal text is what tells
/// `HugeInt` apart from `HighPrec` (`SPEC_FULL.md` §3).
fn classify_high_precision(s: String) -> Value {
    let digits = s.strip_prefix('-').unwrap_or(&s);
    let is_integer = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
    if !is_integer {
        return Value::HighPrec(s);
    }
    match i64::from_str(&s) {
        Ok(n) => Value::Int(n),
        Err(_) => Value::HugeInt(s),
    }
}
