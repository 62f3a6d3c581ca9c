//! Push-style byte sinks for the encoder (`SPEC_FULL.md` §4.2).

use std::io::Write;

use crate::error::{EncoderError, EncoderErrorKind, PathComponent};

/// Abstraction over push-style encoder output.
pub trait ByteSink {
    /// Appends `bytes` to the sink.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), EncoderError>;

    /// Flushes any buffered output. Called exactly once, after the whole
    /// document has been written successfully — a sink is never flushed on
    /// a failed encode, so partial output never reaches the transport
    /// without the caller knowing the encode failed.
    fn flush(&mut self) -> Result<(), EncoderError>;

    /// Convenience for a single marker byte.
    fn write_u8(&mut self, b: u8) -> Result<(), EncoderError> {
        self.write_bytes(&[b])
    }
}

fn io_err(e: std::io::Error) -> EncoderError {
    EncoderError::new(EncoderErrorKind::Io(e.to_string()), Vec::<PathComponent>::new())
}

/// An in-memory sink backing `encode_to_bytes`.
#[derive(Debug, Default)]
pub struct VecSink {
    buf: Vec<u8>,
}

impl VecSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the sink, returning the accumulated bytes.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

impl ByteSink for VecSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), EncoderError> {
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), EncoderError> {
        Ok(())
    }
}

/// A sink over any [`std::io::Write`] transport, backing `encode_to_stream`.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ByteSink for WriterSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), EncoderError> {
        self.writer.write_all(bytes).map_err(io_err)
    }

    fn flush(&mut self) -> Result<(), EncoderError> {
        self.writer.flush().map_err(io_err)
    }
}
