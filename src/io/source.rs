//! Pull-style byte sources for the decoder (`SPEC_FULL.md` §4.2).

use std::io::Read;

use crate::error::{DecoderError, DecoderErrorKind};

/// Abstraction over pull-style decoder input.
///
/// `read_exact` returns exactly `n` bytes or fails with `Truncated`;
/// `read_u8` is the single-byte convenience built on top of it. Every
/// implementation tracks a monotonic `offset` (total bytes consumed) so it
/// can be attached to decode errors.
pub trait ByteSource {
    /// Fills `buf` completely or fails with `DecoderErrorKind::Truncated`.
    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<(), DecoderError>;

    /// The number of bytes consumed so far.
    fn offset(&self) -> u64;

    /// Reads and returns exactly `n` bytes.
    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, DecoderError> {
        let mut buf = vec![0u8; n];
        self.read_exact_into(&mut buf)?;
        Ok(buf)
    }

    /// Reads a single byte.
    fn read_u8(&mut self) -> Result<u8, DecoderError> {
        let mut buf = [0u8; 1];
        self.read_exact_into(&mut buf)?;
        Ok(buf[0])
    }
}

/// An in-memory source over a byte slice. Backs `decode_from_bytes`, which
/// must report how many bytes were consumed so trailing data stays
/// observable to the caller (Testable Property 4 in `SPEC_FULL.md` §8).
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far — the split point between the decoded document
    /// and any trailing data.
    #[must_use]
    pub fn bytes_consumed(&self) -> usize {
        self.pos
    }

    /// The bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<(), DecoderError> {
        let n = buf.len();
        let available = self.data.len() - self.pos;
        if available < n {
            // Report the offset as the point input actually ran out, not
            // the position before this read started — a read spanning the
            // end of the buffer consumes every remaining byte on its way to
            // discovering there aren't enough of them.
            return Err(DecoderError::new(
                DecoderErrorKind::Truncated { needed: n - available },
                self.data.len() as u64,
            ));
        }
        buf.copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(())
    }

    fn offset(&self) -> u64 {
        self.pos as u64
    }
}

/// A source over any [`std::io::Read`] transport. Deliberately unbuffered:
/// each `read_exact_into` call issues exactly one `Read::read_exact` sized
/// to the request, so the source never consumes a byte of the transport
/// beyond the last one a caller demanded. This is what makes
/// `decode_from_stream` "stop exactly after the root value" (`SPEC_FULL.md`
/// §6) true even for sockets and pipes, at the cost of a syscall per read —
/// callers that want buffering and do not care about trailing bytes can
/// wrap their own reader in a `BufReader` before handing it to us.
pub struct ReaderSource<R: Read> {
    reader: R,
    pos: u64,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, pos: 0 }
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<(), DecoderError> {
        // Read in a loop rather than delegating to `Read::read_exact`, which
        // on `UnexpectedEof` discards how many of the requested bytes it
        // actually got. Tracking `filled` ourselves lets us report the
        // offset as the point input actually ran out — matching
        // `SliceSource` — instead of the position before this read started.
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.pos += filled as u64;
                    return Err(DecoderError::new(
                        DecoderErrorKind::Truncated { needed: buf.len() - filled },
                        self.pos,
                    ));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.pos += filled as u64;
                    return Err(DecoderError::new(DecoderErrorKind::Io(e.to_string()), self.pos));
                }
            }
        }
        self.pos += buf.len() as u64;
        Ok(())
    }

    fn offset(&self) -> u64 {
        self.pos
    }
}
