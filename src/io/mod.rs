//! Byte source/sink abstractions the encoder and decoder traverse against.

mod sink;
mod source;

pub use sink::{ByteSink, VecSink, WriterSink};
pub use source::{ByteSource, ReaderSource, SliceSource};
