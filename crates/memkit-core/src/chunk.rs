//! Buffer descriptor views over contiguous byte regions
//!
//! One closed set of variants tagged by ownership: owned-inline
//! (`InlineChunk`), owned-heap (`HeapChunk`), borrowed read-only
//! (`ChunkRef`), and borrowed mutable (`ChunkMut`). Capabilities are the
//! two traits `ChunkRead` and `ChunkWrite`; there is no deeper layering.
//!
//! Bounds for `subset`/`remainder`/`slice` are caller-enforced: out-of-range
//! arguments panic via slice indexing. The bounded copies (`copy_to`,
//! `copy_from`) never panic; they clamp to whichever side is shorter.

/// Read capability over a contiguous byte region
pub trait ChunkRead {
    /// The viewed bytes
    fn data(&self) -> &[u8];

    /// Length of the region in bytes
    #[inline]
    fn length(&self) -> usize {
        self.data().len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    /// Single byte at `pos`, None when out of range
    #[inline]
    fn byte(&self, pos: usize) -> Option<u8> {
        self.data().get(pos).copied()
    }

    /// Borrowed view over the first `len` bytes
    #[inline]
    fn subset(&self, len: usize) -> ChunkRef<'_> {
        ChunkRef::new(&self.data()[..len])
    }

    /// Borrowed view from `pos` to the end
    #[inline]
    fn remainder(&self, pos: usize) -> ChunkRef<'_> {
        ChunkRef::new(&self.data()[pos..])
    }

    /// Borrowed view over `len` bytes starting at `pos`
    #[inline]
    fn slice(&self, pos: usize, len: usize) -> ChunkRef<'_> {
        ChunkRef::new(&self.data()[pos..pos + len])
    }

    /// Copy as many bytes as fit into `out`, returning the count copied
    fn copy_to(&self, out: &mut [u8]) -> usize {
        let n = self.length().min(out.len());
        out[..n].copy_from_slice(&self.data()[..n]);
        n
    }
}

/// Write capability over a contiguous byte region
pub trait ChunkWrite: ChunkRead {
    /// Mutable view of the bytes
    fn data_mut(&mut self) -> &mut [u8];

    /// Fill the whole region with one byte value
    #[inline]
    fn fill(&mut self, value: u8) {
        self.data_mut().fill(value);
    }

    /// Copy as many bytes as fit from `src`, returning the count copied
    fn copy_from(&mut self, src: &[u8]) -> usize {
        let n = self.length().min(src.len());
        self.data_mut()[..n].copy_from_slice(&src[..n]);
        n
    }
}

/// Borrowed read-only view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRef<'a> {
    data: &'a [u8],
}

impl<'a> ChunkRef<'a> {
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> From<&'a [u8]> for ChunkRef<'a> {
    #[inline]
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl<'a> From<&'a str> for ChunkRef<'a> {
    #[inline]
    fn from(s: &'a str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl ChunkRead for ChunkRef<'_> {
    #[inline]
    fn data(&self) -> &[u8] {
        self.data
    }
}

/// Borrowed mutable view
#[derive(Debug, PartialEq, Eq)]
pub struct ChunkMut<'a> {
    data: &'a mut [u8],
}

impl<'a> ChunkMut<'a> {
    #[inline]
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data }
    }
}

impl<'a> From<&'a mut [u8]> for ChunkMut<'a> {
    #[inline]
    fn from(data: &'a mut [u8]) -> Self {
        Self::new(data)
    }
}

impl ChunkRead for ChunkMut<'_> {
    #[inline]
    fn data(&self) -> &[u8] {
        &*self.data
    }
}

impl ChunkWrite for ChunkMut<'_> {
    #[inline]
    fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }
}

/// Owned inline byte array
///
/// The bytes are embedded directly, so the chunk's lifetime is the
/// containing object's and it can live in a `static` or on the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineChunk<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> InlineChunk<N> {
    /// Zero-filled chunk
    #[inline]
    pub const fn new() -> Self {
        Self { bytes: [0; N] }
    }
}

impl<const N: usize> Default for InlineChunk<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> From<[u8; N]> for InlineChunk<N> {
    #[inline]
    fn from(bytes: [u8; N]) -> Self {
        Self { bytes }
    }
}

impl<const N: usize> ChunkRead for InlineChunk<N> {
    #[inline]
    fn data(&self) -> &[u8] {
        &self.bytes
    }
}

impl<const N: usize> ChunkWrite for InlineChunk<N> {
    #[inline]
    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl<const N: usize> AsRef<[u8]> for InlineChunk<N> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<const N: usize> AsMut<[u8]> for InlineChunk<N> {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

/// Owned heap block
///
/// The dynamic-allocation-owning variant, for hosts where a heap exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapChunk {
    bytes: Box<[u8]>,
}

impl HeapChunk {
    /// Zero-filled block of `len` bytes
    pub fn new(len: usize) -> Self {
        Self { bytes: vec![0u8; len].into_boxed_slice() }
    }
}

impl From<Vec<u8>> for HeapChunk {
    #[inline]
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes: bytes.into_boxed_slice() }
    }
}

impl ChunkRead for HeapChunk {
    #[inline]
    fn data(&self) -> &[u8] {
        &self.bytes
    }
}

impl ChunkWrite for HeapChunk {
    #[inline]
    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl AsRef<[u8]> for HeapChunk {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsMut<[u8]> for HeapChunk {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}
