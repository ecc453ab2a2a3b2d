//! LIFO arena allocator over one contiguous region
//!
//! Carves variable-size spans from the front of a backing byte region and
//! reclaims them strictly last-in-first-out. Two bookkeeping layers sit on
//! top of the raw carving:
//!
//! - **Checked mode** (default): every allocation is preceded by a 4-byte
//!   size record, read back on `free` and compared against the handle. A
//!   mismatch means the handle is stale or the free order is wrong; the
//!   free is refused with `ConsistencyCheckFailure` and nothing is
//!   reclaimed. `Arena::unchecked` skips the records entirely.
//! - **Typed values**: `place` constructs a value inside a fresh span and
//!   returns a non-copyable handle; `destroy` runs the value's drop and
//!   reclaims its span in one step. Release order is enforced by
//!   construction: only the most recently placed live value can be
//!   destroyed (and only with no byte spans still above it), and plain
//!   byte frees cannot reach below a live typed span.
//!
//! The backing store is anything `AsRef<[u8]> + AsMut<[u8]>`: an inline
//! array, a borrowed slice, a heap block, a chunk type, or a mapped region
//! from the platform crate. The arena never allocates or frees the backing
//! itself.

use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ptr;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::constants::ARENA_RECORD_BYTES;
use crate::error::{MemError, MemResult};

/// Bytes reserved at the start of every typed span for the previous
/// typed-boundary word. Written regardless of checked mode.
const FLOOR_WORD_BYTES: usize = 4;

/// Source of per-arena identity stamps, so a typed handle can never be
/// replayed against a different arena.
static ARENA_NONCE: AtomicU64 = AtomicU64::new(1);

/// Handle to one byte span carved from an [`Arena`]
///
/// Copyable on purpose: handles outlive their span's validity, and a stale
/// copy is detected on use rather than prevented. `offset`/`len` are
/// private so handles only ever come from `alloc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaRef {
    offset: u32,
    len: u32,
}

impl ArenaRef {
    /// Payload length in bytes
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    const fn start(&self) -> usize {
        self.offset as usize
    }

    #[inline]
    const fn end(&self) -> usize {
        self.offset as usize + self.len as usize
    }
}

/// Handle to a typed value constructed inside an [`Arena`]
///
/// Not copyable: the handle is the value's only ticket to `destroy`, which
/// consumes it. Dropping the handle without `destroy` leaks the value (its
/// drop never runs) and pins the arena's typed boundary at the value's
/// span end.
#[must_use = "dropping the handle leaks the value; pass it to Arena::destroy"]
pub struct ArenaValue<T> {
    span: ArenaRef,
    value_at: u32,
    nonce: u64,
    _marker: PhantomData<T>,
}

impl<T> fmt::Debug for ArenaValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaValue")
            .field("span", &self.span)
            .field("value_at", &self.value_at)
            .finish()
    }
}

/// LIFO allocator over a caller-supplied byte region
pub struct Arena<B> {
    /// Backing region; never grown, shrunk, or freed by the arena
    storage: B,

    /// Consumed boundary: bytes below are carved, bytes above are free
    top: usize,

    /// Whether size records are written and validated
    checked: bool,

    /// Span end of the most recent live typed value, 0 when none live.
    /// Byte frees may not reach below this boundary.
    typed_floor: usize,

    /// Identity stamp carried by every typed handle this arena issues
    nonce: u64,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Arena<B> {
    /// Arena with size-record validation on every free
    pub fn new(storage: B) -> Self {
        Self::with_mode(storage, true)
    }

    /// Arena without size records: no per-allocation overhead, no
    /// free-time validation
    pub fn unchecked(storage: B) -> Self {
        Self::with_mode(storage, false)
    }

    fn with_mode(storage: B, checked: bool) -> Self {
        assert!(
            storage.as_ref().len() <= u32::MAX as usize,
            "arena capacity must fit in u32"
        );
        Self {
            storage,
            top: 0,
            checked,
            typed_floor: 0,
            nonce: ARENA_NONCE.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Carve `len` bytes from the front of the unconsumed region
    ///
    /// Checked mode also writes the size record before the payload. Fails
    /// with `OutOfSpace` when `len` plus the record overhead exceeds
    /// `available()`. O(1).
    pub fn alloc(&mut self, len: usize) -> MemResult<ArenaRef> {
        let overhead = self.record_overhead();
        let need = match len.checked_add(overhead) {
            Some(n) => n,
            None => {
                return Err(MemError::OutOfSpace { requested: len, available: self.available() })
            }
        };
        if need > self.available() {
            return Err(MemError::OutOfSpace { requested: len, available: self.available() });
        }

        if self.checked {
            let record = (len as u32).to_le_bytes();
            let top = self.top;
            self.storage.as_mut()[top..top + ARENA_RECORD_BYTES].copy_from_slice(&record);
        }

        let offset = self.top + overhead;
        self.top += need;
        Ok(ArenaRef { offset: offset as u32, len: len as u32 })
    }

    /// Restore the consumed boundary to the start of `r`
    ///
    /// Address-delta reclaim: everything allocated after `r` is reclaimed
    /// along with it, and the returned count includes record overhead. A
    /// span no longer inside the consumed region fails with
    /// `InvalidHandle`; a checked-mode record mismatch or a span below a
    /// live typed value fails with `ConsistencyCheckFailure`. On any error
    /// nothing is reclaimed.
    pub fn free(&mut self, r: ArenaRef) -> MemResult<usize> {
        let overhead = self.record_overhead();
        if r.end() > self.top || r.start() < overhead {
            return Err(MemError::InvalidHandle);
        }

        let new_top = r.start() - overhead;
        if new_top < self.typed_floor {
            return Err(MemError::ConsistencyCheckFailure {
                recorded: self.typed_floor,
                expected: new_top,
            });
        }

        if self.checked {
            let recorded = self.read_record(r.start());
            if recorded != r.len() {
                return Err(MemError::ConsistencyCheckFailure { recorded, expected: r.len() });
            }
        }

        let reclaimed = self.top - new_top;
        self.top = new_top;
        Ok(reclaimed)
    }

    /// Resolve a span handle to its bytes
    ///
    /// Fails with `InvalidHandle` once the span is no longer inside the
    /// consumed region.
    pub fn get(&self, r: ArenaRef) -> MemResult<&[u8]> {
        if r.end() > self.top {
            return Err(MemError::InvalidHandle);
        }
        Ok(&self.storage.as_ref()[r.start()..r.end()])
    }

    /// Resolve a span handle to its bytes, mutably
    pub fn get_mut(&mut self, r: ArenaRef) -> MemResult<&mut [u8]> {
        if r.end() > self.top {
            return Err(MemError::InvalidHandle);
        }
        Ok(&mut self.storage.as_mut()[r.start()..r.end()])
    }

    /// Construct `value` inside a fresh span and return its typed handle
    ///
    /// The span carries a boundary word plus alignment slack, so it is a
    /// few bytes larger than `size_of::<T>()`. The value's position is
    /// aligned against the backing's address at placement time: with
    /// address-stable backings (heap blocks, borrowed slices, mapped
    /// regions) later access is always aligned, while an inline backing
    /// moved afterwards trips the alignment assert in `value`.
    pub fn place<T>(&mut self, value: T) -> MemResult<ArenaValue<T>> {
        let size = mem::size_of::<T>();
        let align = mem::align_of::<T>();
        let span = self.alloc(FLOOR_WORD_BYTES + size + (align - 1))?;

        let floor_word = (self.typed_floor as u32).to_le_bytes();
        let storage = self.storage.as_mut();
        storage[span.start()..span.start() + FLOOR_WORD_BYTES].copy_from_slice(&floor_word);

        let payload = span.start() + FLOOR_WORD_BYTES;
        let pad = {
            let addr = storage.as_ptr() as usize + payload;
            (align - (addr % align)) % align
        };
        let value_at = payload + pad;
        unsafe {
            ptr::write(storage.as_mut_ptr().add(value_at).cast::<T>(), value);
        }

        self.typed_floor = span.end();
        Ok(ArenaValue {
            span,
            value_at: value_at as u32,
            nonce: self.nonce,
            _marker: PhantomData,
        })
    }

    /// Resolve a typed handle to its value
    ///
    /// Panics if the handle was issued by a different arena, or if an
    /// inline backing was moved since placement and the value is no
    /// longer aligned.
    pub fn value<T>(&self, handle: &ArenaValue<T>) -> &T {
        assert_eq!(handle.nonce, self.nonce, "typed handle belongs to a different arena");
        debug_assert!(handle.span.end() <= self.top);

        let ptr = unsafe { self.storage.as_ref().as_ptr().add(handle.value_at as usize) };
        assert!(
            (ptr as usize) % mem::align_of::<T>() == 0,
            "arena storage moved; typed value misaligned"
        );
        unsafe { &*ptr.cast::<T>() }
    }

    /// Resolve a typed handle to its value, mutably
    pub fn value_mut<T>(&mut self, handle: &mut ArenaValue<T>) -> &mut T {
        assert_eq!(handle.nonce, self.nonce, "typed handle belongs to a different arena");
        debug_assert!(handle.span.end() <= self.top);

        let ptr = unsafe { self.storage.as_mut().as_mut_ptr().add(handle.value_at as usize) };
        assert!(
            (ptr as usize) % mem::align_of::<T>() == 0,
            "arena storage moved; typed value misaligned"
        );
        unsafe { &mut *ptr.cast::<T>() }
    }

    /// Run the value's drop and reclaim its span, in that order
    ///
    /// Only the most recently placed live value can be destroyed, and only
    /// once every byte span allocated above it has been freed: a handle
    /// whose span does not end exactly at the consumed boundary fails with
    /// `ConsistencyCheckFailure` and is handed back untouched (the value
    /// is not dropped), so the caller can retry in the right order. A
    /// handle from a different arena comes back with `InvalidHandle`.
    pub fn destroy<T>(&mut self, handle: ArenaValue<T>) -> Result<(), (MemError, ArenaValue<T>)> {
        if handle.nonce != self.nonce {
            return Err((MemError::InvalidHandle, handle));
        }
        if handle.span.end() != self.typed_floor {
            return Err((
                MemError::ConsistencyCheckFailure {
                    recorded: self.typed_floor,
                    expected: handle.span.end(),
                },
                handle,
            ));
        }
        if handle.span.end() != self.top {
            // Scratch bytes still sit above the value
            return Err((
                MemError::ConsistencyCheckFailure {
                    recorded: self.top,
                    expected: handle.span.end(),
                },
                handle,
            ));
        }
        if self.checked {
            let recorded = self.read_record(handle.span.start());
            if recorded != handle.span.len() {
                return Err((
                    MemError::ConsistencyCheckFailure { recorded, expected: handle.span.len() },
                    handle,
                ));
            }
        }

        let storage = self.storage.as_mut();
        let start = handle.span.start();
        let mut word = [0u8; FLOOR_WORD_BYTES];
        word.copy_from_slice(&storage[start..start + FLOOR_WORD_BYTES]);
        let prev_floor = u32::from_le_bytes(word) as usize;

        unsafe {
            let value_ptr = storage.as_mut_ptr().add(handle.value_at as usize).cast::<T>();
            if (value_ptr as usize) % mem::align_of::<T>() == 0 {
                ptr::drop_in_place(value_ptr);
            } else {
                // Backing moved since placement; lift the bytes out, then drop
                drop(ptr::read_unaligned(value_ptr));
            }
        }

        self.typed_floor = prev_floor;
        self.top = start - self.record_overhead();
        Ok(())
    }

    /// Unconsumed bytes remaining. O(1).
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity() - self.top
    }

    /// Bytes consumed so far, records included. O(1).
    #[inline]
    pub fn used(&self) -> usize {
        self.top
    }

    /// Total backing length in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().len()
    }

    #[inline]
    fn record_overhead(&self) -> usize {
        if self.checked {
            ARENA_RECORD_BYTES
        } else {
            0
        }
    }

    fn read_record(&self, payload_start: usize) -> usize {
        let mut word = [0u8; ARENA_RECORD_BYTES];
        word.copy_from_slice(&self.storage.as_ref()[payload_start - ARENA_RECORD_BYTES..payload_start]);
        u32::from_le_bytes(word) as usize
    }
}
