//! # memkit-core
//!
//! Core allocator and buffer types for memkit: handle-based slot pools,
//! a LIFO arena, and the segmented netbuf family.
//!
//! This crate is platform-agnostic and contains no OS-specific code.
//! OS-backed storage providers live in `memkit-platform`.
//!
//! ## Modules
//!
//! - `handle` - Pool handle type (index + generation)
//! - `chunk` - Buffer descriptor views, owned and borrowed
//! - `cursor` - Chunk plus a processed/unprocessed split position
//! - `pool` - Fixed-capacity slot pool with an index-based free list
//! - `tracked` - Pool variant keeping an iterable live list
//! - `arena` - LIFO arena with checked frees and typed values
//! - `netbuf` - Segmented buffer contract, in-memory backends, reader/writer
//! - `chain` - Adapter for externally-owned segment chains
//! - `error` - Error types
//! - `kprint` - Kernel-style debug printing macros
//! - `env` - Environment variable utilities

#![allow(dead_code)]

pub mod handle;
pub mod chunk;
pub mod cursor;
pub mod pool;
pub mod tracked;
pub mod arena;
pub mod netbuf;
pub mod chain;
pub mod error;
pub mod kprint;
pub mod env;

// Re-exports for convenience
pub use handle::Handle;
pub use chunk::{ChunkMut, ChunkRead, ChunkRef, ChunkWrite, HeapChunk, InlineChunk};
pub use cursor::CursorChunk;
pub use pool::SlotPool;
pub use tracked::{LiveIter, TrackedSlotPool};
pub use arena::{Arena, ArenaRef, ArenaValue};
pub use netbuf::{
    CopyOutcome, HeapNetBuf, InlineNetBuf, NetBuf, NetBufMut, NetBufReader, NetBufWriter,
};
pub use chain::{ChainedNetBuf, SegmentSource, SegmentStep, SliceChain};
pub use error::{MemError, MemResult, RegionError};
pub use env::{env_get, env_get_bool, env_get_opt};

/// Constants shared across the allocator family
pub mod constants {
    /// Free-list terminator in pool link arrays
    pub const EOL: u16 = u16::MAX;

    /// Raw bits of the "no handle" sentinel
    pub const HANDLE_NONE: u32 = u32::MAX;

    /// Checked-mode allocation record size, bytes
    pub const ARENA_RECORD_BYTES: usize = 4;

    /// Default heap netbuf segment size, bytes
    pub const DEFAULT_NETBUF_BYTES: usize = 1024;
}
