//! # memkit - No-Heap Memory Toolkit
//!
//! Fixed-capacity pools, LIFO arenas, and network buffers that never touch
//! the global allocator. Every container works over caller-provided
//! storage: an inline array, a static buffer, or an mmap-backed region.
//!
//! ## Features
//!
//! - **No hidden allocation**: capacity is fixed up front; exhaustion is a
//!   recoverable error, never an abort
//! - **Generation-checked handles**: a stale pool handle is rejected, not
//!   dereferenced
//! - **LIFO arena**: raw byte spans and typed values, with release-order
//!   and size-record checking
//! - **NetBufs**: single buffers and chained segment walks behind one trait,
//!   with silent-clamp writes and strict `_exact` variants
//! - **OS-backed storage**: guard-fenced mmap regions via `memkit-platform`
//!
//! ## Quick Start
//!
//! ```
//! use memkit::{Arena, InlineChunk, SlotPool};
//!
//! // A 256-byte arena on the stack; no heap involved.
//! let mut arena = Arena::new(InlineChunk::<256>::new());
//! let req = arena.alloc(32)?;
//! arena.get_mut(req)?.fill(0xAB);
//! assert_eq!(arena.free(req)?, 36); // 32 bytes plus the size record
//!
//! // A pool of eight connection slots.
//! let mut pool: SlotPool<u32, 8> = SlotPool::new();
//! let conn = pool.allocate(7)?;
//! *pool.lock(conn)? += 1;
//! assert_eq!(pool.deallocate(conn)?, 8);
//! # Ok::<(), memkit::MemError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                       User Code                        │
//! │       allocate(), place(), write(), iter_live()        │
//! └────────────────────────────────────────────────────────┘
//!                             │
//!                             ▼
//! ┌────────────────────────────────────────────────────────┐
//! │                      memkit-core                       │
//! │    SlotPool / TrackedSlotPool    Arena    NetBufs      │
//! │          chunks, cursors, readers, writers             │
//! └────────────────────────────────────────────────────────┘
//!                             │
//!                             ▼
//! ┌────────────────────────────────────────────────────────┐
//! │                    memkit-platform                     │
//! │     Region: mmap, fence pages, commit release          │
//! │   (optional; any byte storage works without the OS)    │
//! └────────────────────────────────────────────────────────┘
//! ```

// Re-export core types
pub use memkit_core::{
    Arena,
    ArenaRef,
    ArenaValue,
    ChainedNetBuf,
    ChunkMut,
    ChunkRead,
    ChunkRef,
    ChunkWrite,
    CopyOutcome,
    CursorChunk,
    Handle,
    HeapChunk,
    HeapNetBuf,
    InlineChunk,
    InlineNetBuf,
    LiveIter,
    MemError,
    MemResult,
    NetBuf,
    NetBufMut,
    NetBufReader,
    NetBufWriter,
    RegionError,
    SegmentSource,
    SegmentStep,
    SliceChain,
    SlotPool,
    TrackedSlotPool,
    constants,
};

// Re-export kprint macros for debug logging
pub use memkit_core::{kprint, kprintln, kerror, kwarn, kinfo, kdebug, ktrace};
pub use memkit_core::kprint::{LogLevel, init as init_logging, set_log_level, set_flush_enabled};

// Re-export env utilities
pub use memkit_core::{env_get, env_get_bool, env_get_opt};

// Re-export platform types
pub use memkit_platform::{page_size, Region, RegionConfig};

/// Map an OS region of at least `bytes` usable bytes and wrap it in an
/// arena.
///
/// The region is guard-fenced with the default settings; capacity is
/// rounded up to a whole number of pages.
pub fn region_arena(bytes: usize) -> Result<Arena<Region>, MemError> {
    let region = Region::with_capacity(bytes)?;
    Ok(Arena::new(region))
}

/// Like [`region_arena`], with the region laid out from the `MEMKIT_*`
/// environment variables.
pub fn region_arena_from_env() -> Result<Arena<Region>, MemError> {
    let region = Region::new(RegionConfig::from_env())?;
    Ok(Arena::new(region))
}
