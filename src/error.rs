//! Error types for the encoder and decoder.
//!
//! Mirrors the `EncoderFailure`/`DecoderFailure` split from the design: every
//! encoder error carries the traversal `path` that failed, every decoder
//! error carries the source byte `offset` at the point of failure.

use std::fmt;
use std::rc::Rc;

/// One step of a traversal path, identifying either an array index or an
/// object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathComponent {
    Index(usize),
    Key(Rc<str>),
}

impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathComponent::Index(i) => write!(f, "[{i}]"),
            PathComponent::Key(k) => write!(f, ".{k}"),
        }
    }
}

fn format_path(path: &[PathComponent]) -> String {
    if path.is_empty() {
        return "$".to_string();
    }
    let mut s = String::from("$");
    for c in path {
        s.push_str(&c.to_string());
    }
    s
}

/// The reason an [`crate::encoder::encode_to_bytes`]/`encode_to_stream` call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncoderErrorKind {
    /// No `default_handler` was configured (or it returned `None`) for a
    /// value the encoder does not natively recognise (only `Value::NoOp`,
    /// see `SPEC_FULL.md` §4.3).
    #[error("value type is not supported by the encoder")]
    UnsupportedType,
    /// A `default_handler` substitution itself needed the handler again.
    #[error("default handler recursed: its substitute value also required the default handler")]
    RecursionViaDefault,
    /// A string payload could not be represented as UTF-8.
    #[error("string value is not valid UTF-8")]
    StringNotUtf8,
    /// An integer did not fit any marker and the `H` fallback was disabled.
    #[error("integer is out of range for the configured markers")]
    IntegerOutOfRange,
    /// The underlying sink's transport reported an I/O failure.
    #[error("I/O error writing to sink: {0}")]
    Io(String),
}

/// An encoder failure: `kind` plus the traversal `path` that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {}", format_path(&path))]
pub struct EncoderError {
    pub kind: EncoderErrorKind,
    pub path: Vec<PathComponent>,
}

impl EncoderError {
    pub(crate) fn new(kind: EncoderErrorKind, path: Vec<PathComponent>) -> Self {
        Self { kind, path }
    }
}

/// The reason a [`crate::decoder::decode_from_bytes`]/`decode_from_stream` call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecoderErrorKind {
    /// The source ran out of bytes before a value or payload was complete.
    #[error("unexpected end of input; needed {needed} more byte(s)")]
    Truncated { needed: usize },
    /// A byte was read where a type marker was expected, and it matches none.
    #[error("unknown type marker 0x{0:02X}")]
    UnknownMarker(u8),
    /// A typed container (`$`) was opened without a following count (`#`).
    #[error("typed container is missing its count prefix")]
    InvalidTypedContainer,
    /// An untyped, uncounted container reached end of input before its closer.
    #[error("container was never closed")]
    UnclosedContainer,
    /// A `[`/`{` opener was closed by the wrong marker, or a closer/element
    /// boundary was malformed for the container kind currently open.
    #[error("container opener/closer mismatch")]
    ContainerMismatch,
    /// A length prefix decoded to a negative integer.
    #[error("length prefix is negative")]
    NegativeLength,
    /// A string payload was not valid UTF-8.
    #[error("string payload is not valid UTF-8")]
    BadUtf8,
    /// Nesting exceeded the configured `max_depth`.
    #[error("nesting depth exceeds configured max_depth ({0})")]
    DepthExceeded(usize),
    /// A counted container declared more elements than `max_container_len`.
    #[error("container length exceeds configured max_container_len ({0})")]
    LengthExceeded(usize),
    /// `object_hook` or `object_pairs_hook` returned an error.
    #[error("hook raised: {0}")]
    HookRaised(String),
    /// The underlying source's transport reported an I/O failure.
    #[error("I/O error reading from source: {0}")]
    Io(String),
}

/// A decoder failure: `kind` plus the byte `offset` at which it was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset}")]
pub struct DecoderError {
    pub kind: DecoderErrorKind,
    pub offset: u64,
}

impl DecoderError {
    pub(crate) fn new(kind: DecoderErrorKind, offset: u64) -> Self {
        Self { kind, offset }
    }
}
