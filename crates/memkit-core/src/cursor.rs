//! Chunk plus a processed/unprocessed split point
//!
//! `CursorChunk` pairs any chunk with a cursor position. Bytes before the
//! cursor are processed, bytes at and after it are unprocessed, and the
//! two views always partition the chunk exactly. `advance` is checked and
//! saturating nowhere: stepping past the end is a `BoundsViolation` and
//! the position stays put.

use crate::chunk::{ChunkMut, ChunkRead, ChunkRef, ChunkWrite};
use crate::error::{MemError, MemResult};

/// A chunk with a cursor splitting processed from unprocessed bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorChunk<C> {
    chunk: C,
    pos: usize,
}

impl<C: ChunkRead> CursorChunk<C> {
    /// Wrap `chunk` with the cursor at zero
    #[inline]
    pub fn new(chunk: C) -> Self {
        Self { chunk, pos: 0 }
    }

    /// Current cursor position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total capacity of the underlying chunk
    #[inline]
    pub fn capacity(&self) -> usize {
        self.chunk.length()
    }

    /// Bytes before the cursor
    #[inline]
    pub fn length_processed(&self) -> usize {
        self.pos
    }

    /// Bytes at and after the cursor
    #[inline]
    pub fn length_unprocessed(&self) -> usize {
        self.chunk.length() - self.pos
    }

    /// Move the cursor forward by `n` bytes
    ///
    /// Fails without moving when the step would pass the end of the chunk.
    pub fn advance(&mut self, n: usize) -> MemResult<()> {
        let limit = self.chunk.length();
        match self.pos.checked_add(n) {
            Some(next) if next <= limit => {
                self.pos = next;
                Ok(())
            }
            _ => Err(MemError::BoundsViolation { pos: self.pos.saturating_add(n), limit }),
        }
    }

    /// Move the cursor back to zero
    #[inline]
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// View over the bytes before the cursor
    #[inline]
    pub fn processed(&self) -> ChunkRef<'_> {
        self.chunk.subset(self.pos)
    }

    /// View over the bytes at and after the cursor
    #[inline]
    pub fn unprocessed(&self) -> ChunkRef<'_> {
        self.chunk.remainder(self.pos)
    }

    /// The wrapped chunk
    #[inline]
    pub fn chunk(&self) -> &C {
        &self.chunk
    }

    #[inline]
    pub fn chunk_mut(&mut self) -> &mut C {
        &mut self.chunk
    }

    /// Unwrap, discarding the cursor
    #[inline]
    pub fn into_inner(self) -> C {
        self.chunk
    }
}

impl<C: ChunkWrite> CursorChunk<C> {
    /// Mutable view over the bytes at and after the cursor
    #[inline]
    pub fn unprocessed_mut(&mut self) -> ChunkMut<'_> {
        let pos = self.pos;
        ChunkMut::new(&mut self.chunk.data_mut()[pos..])
    }
}
