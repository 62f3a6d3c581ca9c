//! A non-recursive encoder and decoder for Universal Binary JSON (UBJSON),
//! Draft-12.
//!
//! ```
//! use ubjson_codec::{decode_from_bytes, encode_to_bytes, DecoderConfig, EncoderConfig, Value};
//!
//! let doc = Value::Object(vec![
//!     ("id".into(), Value::Int(7)),
//!     ("name".into(), Value::String("widget".into())),
//! ]);
//!
//! let bytes = encode_to_bytes(&doc, &EncoderConfig::default()).unwrap();
//! let (decoded, consumed) = decode_from_bytes(&bytes, &DecoderConfig::default()).unwrap();
//!
//! assert_eq!(decoded, doc);
//! assert_eq!(consumed, bytes.len());
//! ```
//!
//! Both directions traverse the document with an explicit stack rather than
//! the Rust call stack, so encoding or decoding depth is bounded by
//! available heap rather than by how deep a recursive call chain can go
//! before overflowing.

mod decoder;
mod encoder;
mod error;
mod io;
mod marker;
#[cfg(test)]
mod tests;
mod value;

pub use decoder::{decode_from_bytes, decode_from_stream, DecoderConfig, ObjectHook};
pub use encoder::{encode_to_bytes, encode_to_stream, DefaultHandler, EncoderConfig};
pub use error::{DecoderError, DecoderErrorKind, EncoderError, EncoderErrorKind, PathComponent};
pub use io::{ByteSink, ByteSource, ReaderSource, SliceSource, VecSink, WriterSink};
pub use value::{Array, Object, Value};
