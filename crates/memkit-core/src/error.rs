//! Error types for the memkit allocators and buffers

use core::fmt;

/// Result type for allocator and buffer operations
pub type MemResult<T> = Result<T, MemError>;

/// Errors that can occur in allocator and buffer operations
///
/// Every condition here is local, synchronous, and recoverable; nothing in
/// this crate aborts or panics on an allocation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemError {
    /// A pool `allocate()` found the free list empty
    Exhausted,

    /// An arena `alloc()` request exceeds the remaining capacity
    OutOfSpace {
        /// Bytes requested
        requested: usize,
        /// Bytes still unconsumed
        available: usize,
    },

    /// An `advance`/`write_exact`/`read_exact` would move past the end
    BoundsViolation {
        /// Position the operation would have reached
        pos: usize,
        /// Length of the region being walked
        limit: usize,
    },

    /// Handle out of range, not currently allocated, or stale generation
    InvalidHandle,

    /// Arena bookkeeping disagrees with the caller's claim
    ///
    /// Raised when a checked-mode size record does not match the freed
    /// span, or when a typed value is released out of LIFO order.
    ConsistencyCheckFailure {
        /// What the arena's own records say
        recorded: usize,
        /// What the caller's handle claimed
        expected: usize,
    },

    /// Platform storage error
    Region(RegionError),
}

impl fmt::Display for MemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemError::Exhausted => write!(f, "pool exhausted"),
            MemError::OutOfSpace { requested, available } => {
                write!(f, "out of space: requested {} bytes, {} available", requested, available)
            }
            MemError::BoundsViolation { pos, limit } => {
                write!(f, "bounds violation: position {} past limit {}", pos, limit)
            }
            MemError::InvalidHandle => write!(f, "invalid handle"),
            MemError::ConsistencyCheckFailure { recorded, expected } => {
                write!(f, "consistency check failed: recorded {}, expected {}", recorded, expected)
            }
            MemError::Region(e) => write!(f, "region error: {}", e),
        }
    }
}

impl std::error::Error for MemError {}

/// OS-backed region errors
///
/// Raised by the platform crate's storage providers; carried here so the
/// whole workspace shares one error surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    /// mmap failed (errno)
    Map(i32),

    /// mprotect failed (errno)
    Protect(i32),

    /// madvise failed (errno)
    Advise(i32),

    /// Zero-length region requested
    ZeroLength,
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionError::Map(errno) => write!(f, "mmap failed: errno {}", errno),
            RegionError::Protect(errno) => write!(f, "mprotect failed: errno {}", errno),
            RegionError::Advise(errno) => write!(f, "madvise failed: errno {}", errno),
            RegionError::ZeroLength => write!(f, "zero-length region requested"),
        }
    }
}

impl std::error::Error for RegionError {}

impl From<RegionError> for MemError {
    fn from(e: RegionError) -> Self {
        MemError::Region(e)
    }
}
