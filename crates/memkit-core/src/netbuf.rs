//! Segmented buffer contract and the in-memory backends
//!
//! `NetBuf` is the chain-capability contract reader/writer code is written
//! against: a current segment (bytes + cursor) plus traversal
//! (`first`/`next`/`end`). The two owned backends here are degenerate
//! one-segment chains — `next()` never finds more — so the same caller
//! code runs unchanged over a static array, a heap block, or a real
//! multi-segment source (see [`chain`]).
//!
//! `NetBufWriter`/`NetBufReader` are thin adapters over any backend. Byte
//! copies clamp to the current segment and report the clamp through
//! [`CopyOutcome`]; the `*_exact` variants refuse short operations
//! instead. Neither adapter ever advances the chain on its own: when a
//! segment fills up or runs dry, stepping to the next one is the caller's
//! call.
//!
//! [`chain`]: crate::chain

use core::fmt;

use crate::chunk::{ChunkRead, ChunkWrite, HeapChunk, InlineChunk};
use crate::constants::DEFAULT_NETBUF_BYTES;
use crate::cursor::CursorChunk;
use crate::error::{MemError, MemResult};

/// Chain-capability contract: one current segment plus traversal
pub trait NetBuf {
    /// Length of the current segment
    fn length(&self) -> usize;

    /// Bytes of the current segment
    fn data(&self) -> &[u8];

    /// Cursor position within the current segment
    fn position(&self) -> usize;

    /// Move the cursor forward within the current segment
    fn advance(&mut self, n: usize) -> MemResult<()>;

    /// Step to the following physical segment
    ///
    /// Returns `false` when no further segment exists; single-segment
    /// backends always say `false`. On success the cursor resets to 0 and
    /// the backend may additionally record that the new segment is the
    /// last one (see `end`).
    fn next(&mut self) -> bool;

    /// Rewind to the first physical segment, cursor 0, end flag cleared
    fn first(&mut self);

    /// True exactly when the most recent successful `next()` landed on
    /// the last segment
    fn end(&self) -> bool;

    /// Payload bytes of the current segment
    ///
    /// For outgoing (written-by-us) backends this is the cursor position.
    /// Incoming backends override it to the full segment length, since
    /// the producer filled the segment before handing it over.
    #[inline]
    fn length_processed(&self) -> usize {
        self.position()
    }

    /// Bytes between the cursor and the segment end
    #[inline]
    fn length_unprocessed(&self) -> usize {
        self.length() - self.position()
    }

    /// View of the payload bytes
    #[inline]
    fn processed(&self) -> &[u8] {
        &self.data()[..self.length_processed()]
    }

    /// View of the bytes from the cursor to the segment end
    #[inline]
    fn unprocessed(&self) -> &[u8] {
        &self.data()[self.position()..]
    }
}

/// Writable chain backend
pub trait NetBufMut: NetBuf {
    /// Mutable bytes of the current segment
    fn data_mut(&mut self) -> &mut [u8];

    /// Mutable view from the cursor to the segment end
    #[inline]
    fn unprocessed_mut(&mut self) -> &mut [u8] {
        let pos = self.position();
        &mut self.data_mut()[pos..]
    }
}

/// Owned inline single segment
///
/// A degenerate one-segment chain over an embedded array; can live in a
/// `static` or on the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineNetBuf<const N: usize> {
    inner: CursorChunk<InlineChunk<N>>,
}

impl<const N: usize> InlineNetBuf<N> {
    pub fn new() -> Self {
        Self { inner: CursorChunk::new(InlineChunk::new()) }
    }
}

impl<const N: usize> Default for InlineNetBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> NetBuf for InlineNetBuf<N> {
    #[inline]
    fn length(&self) -> usize {
        self.inner.capacity()
    }

    #[inline]
    fn data(&self) -> &[u8] {
        self.inner.chunk().data()
    }

    #[inline]
    fn position(&self) -> usize {
        self.inner.position()
    }

    #[inline]
    fn advance(&mut self, n: usize) -> MemResult<()> {
        self.inner.advance(n)
    }

    fn next(&mut self) -> bool {
        false
    }

    fn first(&mut self) {
        self.inner.reset();
    }

    fn end(&self) -> bool {
        false
    }
}

impl<const N: usize> NetBufMut for InlineNetBuf<N> {
    #[inline]
    fn data_mut(&mut self) -> &mut [u8] {
        self.inner.chunk_mut().data_mut()
    }
}

/// Owned heap single segment
///
/// Same degenerate chain behavior as [`InlineNetBuf`], sized at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapNetBuf {
    inner: CursorChunk<HeapChunk>,
}

impl HeapNetBuf {
    pub fn new(len: usize) -> Self {
        Self { inner: CursorChunk::new(HeapChunk::new(len)) }
    }
}

impl Default for HeapNetBuf {
    /// A segment of `DEFAULT_NETBUF_BYTES`
    fn default() -> Self {
        Self::new(DEFAULT_NETBUF_BYTES)
    }
}

impl NetBuf for HeapNetBuf {
    #[inline]
    fn length(&self) -> usize {
        self.inner.capacity()
    }

    #[inline]
    fn data(&self) -> &[u8] {
        self.inner.chunk().data()
    }

    #[inline]
    fn position(&self) -> usize {
        self.inner.position()
    }

    #[inline]
    fn advance(&mut self, n: usize) -> MemResult<()> {
        self.inner.advance(n)
    }

    fn next(&mut self) -> bool {
        false
    }

    fn first(&mut self) {
        self.inner.reset();
    }

    fn end(&self) -> bool {
        false
    }
}

impl NetBufMut for HeapNetBuf {
    #[inline]
    fn data_mut(&mut self) -> &mut [u8] {
        self.inner.chunk_mut().data_mut()
    }
}

/// Result of a clamped byte copy
///
/// `Complete` when every requested byte moved, `Short` when the copy was
/// clamped to the current segment. `copied()` gives the count either way,
/// for callers that do not care about the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// All requested bytes were copied
    Complete(usize),

    /// Only this many bytes fit in the current segment
    Short(usize),
}

impl CopyOutcome {
    /// Bytes actually copied
    #[inline]
    pub const fn copied(&self) -> usize {
        match self {
            CopyOutcome::Complete(n) | CopyOutcome::Short(n) => *n,
        }
    }

    #[inline]
    pub const fn is_complete(&self) -> bool {
        matches!(self, CopyOutcome::Complete(_))
    }
}

/// Writer adapter over any writable chain backend
///
/// Writes clamp to the current segment and never auto-step the chain;
/// continuing into a further segment is the caller's job via
/// `netbuf_mut().next()`.
pub struct NetBufWriter<B: NetBufMut> {
    netbuf: B,
}

impl<B: NetBufMut> NetBufWriter<B> {
    pub fn new(netbuf: B) -> Self {
        Self { netbuf }
    }

    /// Copy as much of `bytes` as fits into the current segment
    ///
    /// Advances by the copied count; a clamp shows up as `Short`.
    pub fn write(&mut self, bytes: &[u8]) -> CopyOutcome {
        let n = bytes.len().min(self.netbuf.length_unprocessed());
        self.netbuf.unprocessed_mut()[..n].copy_from_slice(&bytes[..n]);
        // n is clamped to the free space; this cannot fail
        let _ = self.netbuf.advance(n);
        if n == bytes.len() {
            CopyOutcome::Complete(n)
        } else {
            CopyOutcome::Short(n)
        }
    }

    /// All-or-nothing write: fails without copying when `bytes` does not
    /// fit in the current segment
    pub fn write_exact(&mut self, bytes: &[u8]) -> MemResult<()> {
        if bytes.len() > self.netbuf.length_unprocessed() {
            return Err(MemError::BoundsViolation {
                pos: self.netbuf.position() + bytes.len(),
                limit: self.netbuf.length(),
            });
        }
        self.write(bytes);
        Ok(())
    }

    /// Write one byte; `false` when the segment is full
    pub fn putchar(&mut self, byte: u8) -> bool {
        if self.netbuf.length_unprocessed() == 0 {
            return false;
        }
        self.netbuf.unprocessed_mut()[0] = byte;
        let _ = self.netbuf.advance(1);
        true
    }

    /// Writable bytes remaining in the current segment
    #[inline]
    pub fn size(&self) -> usize {
        self.netbuf.length_unprocessed()
    }

    /// Capacity of the current segment only, not the whole chain
    #[inline]
    pub fn max_size(&self) -> usize {
        self.netbuf.length()
    }

    #[inline]
    pub fn netbuf(&self) -> &B {
        &self.netbuf
    }

    #[inline]
    pub fn netbuf_mut(&mut self) -> &mut B {
        &mut self.netbuf
    }

    pub fn into_inner(self) -> B {
        self.netbuf
    }
}

impl<B: NetBufMut> fmt::Write for NetBufWriter<B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self.write(s.as_bytes()) {
            CopyOutcome::Complete(_) => Ok(()),
            CopyOutcome::Short(_) => Err(fmt::Error),
        }
    }
}

/// Reader adapter over any chain backend
///
/// Reads consume the unprocessed suffix of the current segment; stepping
/// to the next segment is the caller's job, same as the writer.
pub struct NetBufReader<B: NetBuf> {
    netbuf: B,
}

impl<B: NetBuf> NetBufReader<B> {
    pub fn new(netbuf: B) -> Self {
        Self { netbuf }
    }

    /// Payload bytes of the current segment
    #[inline]
    pub fn size(&self) -> usize {
        self.netbuf.length_processed()
    }

    /// Unread bytes remaining in the current segment
    #[inline]
    pub fn remaining(&self) -> usize {
        self.netbuf.length_unprocessed()
    }

    /// Copy as much as fits of the unread suffix into `out`
    pub fn read(&mut self, out: &mut [u8]) -> CopyOutcome {
        let n = out.len().min(self.netbuf.length_unprocessed());
        out[..n].copy_from_slice(&self.netbuf.unprocessed()[..n]);
        // n is clamped to the unread suffix; this cannot fail
        let _ = self.netbuf.advance(n);
        if n == out.len() {
            CopyOutcome::Complete(n)
        } else {
            CopyOutcome::Short(n)
        }
    }

    /// All-or-nothing read: fails without consuming when fewer than
    /// `out.len()` bytes remain in the current segment
    pub fn read_exact(&mut self, out: &mut [u8]) -> MemResult<()> {
        if out.len() > self.netbuf.length_unprocessed() {
            return Err(MemError::BoundsViolation {
                pos: self.netbuf.position() + out.len(),
                limit: self.netbuf.length(),
            });
        }
        self.read(out);
        Ok(())
    }

    /// Skip `n` unread bytes
    pub fn advance(&mut self, n: usize) -> MemResult<()> {
        self.netbuf.advance(n)
    }

    #[inline]
    pub fn netbuf(&self) -> &B {
        &self.netbuf
    }

    #[inline]
    pub fn netbuf_mut(&mut self) -> &mut B {
        &mut self.netbuf
    }

    pub fn into_inner(self) -> B {
        self.netbuf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write as _;

    #[test]
    fn test_writer_truncation_arithmetic() {
        let mut writer = NetBufWriter::new(InlineNetBuf::<256>::new());

        assert_eq!(writer.write(b"Hello"), CopyOutcome::Complete(5));
        assert_eq!(writer.write(b":123"), CopyOutcome::Complete(4));

        assert_eq!(writer.size(), 256 - 9);
        assert_eq!(writer.max_size(), 256);
        assert_eq!(writer.netbuf().processed(), b"Hello:123");
    }

    #[test]
    fn test_writer_overflow_clamp() {
        let mut writer = NetBufWriter::new(InlineNetBuf::<8>::new());

        assert_eq!(writer.write(b"12345"), CopyOutcome::Complete(5));

        // Only three bytes fit; the rest is dropped
        let outcome = writer.write(b"abcdef");
        assert_eq!(outcome, CopyOutcome::Short(3));
        assert!(!outcome.is_complete());
        assert_eq!(outcome.copied(), 3);
        assert_eq!(writer.size(), 0);
        assert_eq!(writer.netbuf().data(), b"12345abc");

        // Full segment: every further write clamps to nothing
        assert_eq!(writer.write(b"x"), CopyOutcome::Short(0));
    }

    #[test]
    fn test_write_exact_all_or_nothing() {
        let mut writer = NetBufWriter::new(InlineNetBuf::<8>::new());

        writer.write_exact(b"123456").unwrap();

        let err = writer.write_exact(b"abc").unwrap_err();
        assert_eq!(err, MemError::BoundsViolation { pos: 9, limit: 8 });
        // Nothing was copied by the failed call
        assert_eq!(writer.size(), 2);
        assert_eq!(writer.netbuf().processed(), b"123456");
    }

    #[test]
    fn test_putchar() {
        let mut writer = NetBufWriter::new(InlineNetBuf::<3>::new());

        assert!(writer.putchar(b'a'));
        assert!(writer.putchar(b'b'));
        assert!(writer.putchar(b'c'));
        assert!(!writer.putchar(b'd'));
        assert_eq!(writer.netbuf().data(), b"abc");
    }

    #[test]
    fn test_fmt_write_integration() {
        let mut writer = NetBufWriter::new(InlineNetBuf::<32>::new());

        write!(writer, "code={} reason={}", 7, "busy").unwrap();
        assert_eq!(writer.netbuf().processed(), b"code=7 reason=busy");

        // A formatted write that cannot fit reports fmt::Error
        let mut tiny = NetBufWriter::new(InlineNetBuf::<4>::new());
        assert!(write!(tiny, "overlong {}", 123456).is_err());
    }

    #[test]
    fn test_single_segment_degenerate_chain() {
        let mut nb = InlineNetBuf::<16>::new();

        assert!(!nb.next());
        assert!(!nb.end());

        nb.advance(10).unwrap();
        assert!(!nb.next());
        // next() found nothing, so the cursor stays where it was
        assert_eq!(nb.position(), 10);

        nb.first();
        assert_eq!(nb.position(), 0);
        assert!(!nb.end());
    }

    #[test]
    fn test_heap_netbuf_default_size() {
        let nb = HeapNetBuf::default();
        assert_eq!(nb.length(), DEFAULT_NETBUF_BYTES);

        let nb = HeapNetBuf::new(64);
        assert_eq!(nb.length(), 64);
        assert_eq!(nb.length_unprocessed(), 64);
    }

    #[test]
    fn test_reader_roundtrip() {
        let mut writer = NetBufWriter::new(HeapNetBuf::new(32));
        writer.write(b"ping/pong");

        let mut nb = writer.into_inner();
        nb.first();

        let mut reader = NetBufReader::new(nb);
        assert_eq!(reader.size(), 0);
        assert_eq!(reader.remaining(), 32);

        let mut out = [0u8; 9];
        assert_eq!(reader.read(&mut out), CopyOutcome::Complete(9));
        assert_eq!(&out, b"ping/pong");
        assert_eq!(reader.size(), 9);
    }

    #[test]
    fn test_reader_clamp_and_exact() {
        let mut nb = InlineNetBuf::<8>::new();
        nb.data_mut().copy_from_slice(b"abcdefgh");

        let mut reader = NetBufReader::new(nb);
        reader.advance(5).unwrap();

        // Exact read past the remaining suffix fails without consuming
        let mut out = [0u8; 4];
        let err = reader.read_exact(&mut out).unwrap_err();
        assert_eq!(err, MemError::BoundsViolation { pos: 9, limit: 8 });
        assert_eq!(reader.remaining(), 3);

        // Clamped read drains what is left
        let outcome = reader.read(&mut out);
        assert_eq!(outcome, CopyOutcome::Short(3));
        assert_eq!(&out[..3], b"fgh");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_reader_advance_checked() {
        let nb = InlineNetBuf::<8>::new();
        let mut reader = NetBufReader::new(nb);

        reader.advance(8).unwrap();
        assert!(matches!(reader.advance(1), Err(MemError::BoundsViolation { .. })));
    }
}
