//! Adapter for externally-owned multi-segment buffer chains
//!
//! A network stack hands over incoming packets as a chain of physical
//! buffers it owns. `SegmentSource` is that provider's native contract:
//! expose the current segment, step forward with a tri-state result,
//! rewind. `ChainedNetBuf` translates it onto the [`NetBuf`] chain
//! contract so reader code cannot tell a packet-buffer chain from a plain
//! in-memory segment.
//!
//! Segment lifetime stays with the source: constructing and dropping the
//! adapter never allocates or frees segment storage.

use crate::error::{MemError, MemResult};
use crate::netbuf::NetBuf;

/// Result of asking a segment source to step forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStep {
    /// No further segment; the source did not move
    Failed,

    /// Moved to the following segment; more remain after it
    More,

    /// Moved to the following segment; it is the last one
    Final,
}

/// Native contract of an external multi-segment provider
pub trait SegmentSource {
    /// Bytes of the current segment
    fn segment(&self) -> &[u8];

    /// Try to move to the following segment
    fn step(&mut self) -> SegmentStep;

    /// Move back to the first segment
    fn rewind(&mut self);
}

/// Incoming chain backend over an external [`SegmentSource`]
///
/// Translates the source's tri-state `step()` onto the boolean
/// `next()`/`end()` pair: `Failed` means no further segment, `More` steps
/// normally, `Final` steps and latches the end flag. Segments arrive
/// producer-filled, so the whole current segment counts as payload.
pub struct ChainedNetBuf<S> {
    source: S,
    pos: usize,
    end: bool,
}

impl<S: SegmentSource> ChainedNetBuf<S> {
    pub fn new(source: S) -> Self {
        Self { source, pos: 0, end: false }
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: SegmentSource> NetBuf for ChainedNetBuf<S> {
    #[inline]
    fn length(&self) -> usize {
        self.source.segment().len()
    }

    #[inline]
    fn data(&self) -> &[u8] {
        self.source.segment()
    }

    #[inline]
    fn position(&self) -> usize {
        self.pos
    }

    fn advance(&mut self, n: usize) -> MemResult<()> {
        let limit = self.length();
        match self.pos.checked_add(n) {
            Some(next) if next <= limit => {
                self.pos = next;
                Ok(())
            }
            _ => Err(MemError::BoundsViolation { pos: self.pos.saturating_add(n), limit }),
        }
    }

    fn next(&mut self) -> bool {
        match self.source.step() {
            SegmentStep::Failed => false,
            SegmentStep::More => {
                self.pos = 0;
                true
            }
            SegmentStep::Final => {
                self.pos = 0;
                self.end = true;
                true
            }
        }
    }

    fn first(&mut self) {
        self.source.rewind();
        self.pos = 0;
        self.end = false;
    }

    #[inline]
    fn end(&self) -> bool {
        self.end
    }

    /// Producer-filled segments: the whole segment is payload
    #[inline]
    fn length_processed(&self) -> usize {
        self.length()
    }
}

/// Segment source over a borrowed list of byte slices
///
/// The bundled concrete source, enough for tests and for callers whose
/// segments already live in memory.
pub struct SliceChain<'a> {
    segments: &'a [&'a [u8]],
    index: usize,
}

impl<'a> SliceChain<'a> {
    pub fn new(segments: &'a [&'a [u8]]) -> Self {
        Self { segments, index: 0 }
    }
}

impl SegmentSource for SliceChain<'_> {
    fn segment(&self) -> &[u8] {
        self.segments.get(self.index).copied().unwrap_or(&[])
    }

    fn step(&mut self) -> SegmentStep {
        let next = self.index + 1;
        if next >= self.segments.len() {
            return SegmentStep::Failed;
        }
        self.index = next;
        if next + 1 == self.segments.len() {
            SegmentStep::Final
        } else {
            SegmentStep::More
        }
    }

    fn rewind(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netbuf::NetBufReader;

    #[test]
    fn test_tri_state_translation() {
        let segments: [&[u8]; 3] = [b"ab", b"cde", b"f"];
        let mut nb = ChainedNetBuf::new(SliceChain::new(&segments));

        assert_eq!(nb.data(), b"ab");
        assert!(!nb.end());

        assert!(nb.next());
        assert_eq!(nb.data(), b"cde");
        assert!(!nb.end());

        assert!(nb.next());
        assert_eq!(nb.data(), b"f");
        assert!(nb.end());

        // Chain exhausted: no move, end flag stays latched
        assert!(!nb.next());
        assert_eq!(nb.data(), b"f");
        assert!(nb.end());
    }

    #[test]
    fn test_first_rewinds_and_clears_end() {
        let segments: [&[u8]; 2] = [b"head", b"tail"];
        let mut nb = ChainedNetBuf::new(SliceChain::new(&segments));

        nb.advance(2).unwrap();
        assert!(nb.next());
        assert!(nb.end());

        nb.first();
        assert_eq!(nb.data(), b"head");
        assert_eq!(nb.position(), 0);
        assert!(!nb.end());
    }

    #[test]
    fn test_position_resets_on_next() {
        let segments: [&[u8]; 2] = [b"ab", b"cd"];
        let mut nb = ChainedNetBuf::new(SliceChain::new(&segments));

        nb.advance(2).unwrap();
        assert_eq!(nb.position(), 2);

        assert!(nb.next());
        assert_eq!(nb.position(), 0);
        assert_eq!(nb.length_unprocessed(), 2);
    }

    #[test]
    fn test_advance_bounded_by_segment() {
        let segments: [&[u8]; 2] = [b"ab", b"cdef"];
        let mut nb = ChainedNetBuf::new(SliceChain::new(&segments));

        let err = nb.advance(3).unwrap_err();
        assert_eq!(err, MemError::BoundsViolation { pos: 3, limit: 2 });
        assert_eq!(nb.position(), 0);
    }

    #[test]
    fn test_incoming_payload_semantics() {
        let segments: [&[u8]; 1] = [b"payload"];
        let mut nb = ChainedNetBuf::new(SliceChain::new(&segments));

        // The producer filled the segment: all of it is payload,
        // regardless of how far the cursor has moved
        assert_eq!(nb.length_processed(), 7);
        nb.advance(3).unwrap();
        assert_eq!(nb.length_processed(), 7);
        assert_eq!(nb.processed(), b"payload");
        assert_eq!(nb.unprocessed(), b"load");
    }

    #[test]
    fn test_single_segment_source_degenerate() {
        let segments: [&[u8]; 1] = [b"only"];
        let mut nb = ChainedNetBuf::new(SliceChain::new(&segments));

        assert!(!nb.next());
        assert!(!nb.end());
        assert_eq!(nb.data(), b"only");
    }

    #[test]
    fn test_empty_chain() {
        let segments: [&[u8]; 0] = [];
        let mut nb = ChainedNetBuf::new(SliceChain::new(&segments));

        assert_eq!(nb.length(), 0);
        assert!(!nb.next());
        assert!(matches!(nb.advance(1), Err(MemError::BoundsViolation { .. })));
    }

    #[test]
    fn test_reader_over_chain() {
        let segments: [&[u8]; 3] = [b"ab", b"cde", b"f"];
        let mut reader = NetBufReader::new(ChainedNetBuf::new(SliceChain::new(&segments)));

        let mut collected = Vec::new();
        loop {
            let mut out = [0u8; 8];
            let n = reader.read(&mut out).copied();
            collected.extend_from_slice(&out[..n]);
            if !reader.netbuf_mut().next() {
                break;
            }
        }

        assert_eq!(collected, b"abcdef");
        assert!(reader.netbuf().end());
    }
}
