//! Slot pool variant that keeps its live set on a second list
//!
//! Same allocate/deallocate/lock contract as [`SlotPool`], plus a
//! doubly-linked list through the allocated slots so the live set can be
//! iterated without scanning the whole array and `count_allocated()` is
//! O(1). Costs one extra `u16` link array and a constant-time unlink on
//! every deallocate.
//!
//! [`SlotPool`]: crate::pool::SlotPool

use core::array;

use crate::constants::EOL;
use crate::error::{MemError, MemResult};
use crate::handle::Handle;

/// Fixed-capacity pool with an iterable live list
///
/// The `next` array serves double duty: free-chain link while the slot is
/// free, live-list forward link while it is allocated. `prev` is only
/// meaningful for live slots.
pub struct TrackedSlotPool<T, const N: usize> {
    /// Value storage, `Some` exactly while the slot is allocated
    values: [Option<T>; N],

    /// Generation stamp per slot, bumped on every deallocate
    generations: [u16; N],

    /// Forward link: free chain or live list, depending on slot state
    next: [u16; N],

    /// Backward link within the live list
    prev: [u16; N],

    /// Index of the first free slot, `EOL` when exhausted
    free_front: u16,

    /// Index of the most recently allocated live slot
    live_front: u16,

    /// Live-slot count, maintained incrementally
    live_count: usize,
}

impl<T, const N: usize> TrackedSlotPool<T, N> {
    /// Create a pool with every slot free, chained in index order
    pub fn new() -> Self {
        assert!(N < EOL as usize, "pool capacity must be below u16::MAX");

        let mut next = [EOL; N];
        for (i, link) in next.iter_mut().enumerate() {
            let n = i + 1;
            *link = if n == N { EOL } else { n as u16 };
        }

        Self {
            values: array::from_fn(|_| None),
            generations: [0; N],
            next,
            prev: [EOL; N],
            free_front: if N == 0 { EOL } else { 0 },
            live_front: EOL,
            live_count: 0,
        }
    }

    /// Take the front free slot, store `value`, link it into the live list
    ///
    /// Fails with `Exhausted` when the free list is empty. O(1).
    pub fn allocate(&mut self, value: T) -> MemResult<Handle> {
        if self.free_front == EOL {
            return Err(MemError::Exhausted);
        }

        let idx = self.free_front as usize;
        self.free_front = self.next[idx];

        // Push onto the live list front
        self.next[idx] = self.live_front;
        self.prev[idx] = EOL;
        if self.live_front != EOL {
            self.prev[self.live_front as usize] = idx as u16;
        }
        self.live_front = idx as u16;
        self.live_count += 1;

        self.values[idx] = Some(value);
        Ok(Handle::new(idx as u16, self.generations[idx]))
    }

    /// Remove the value behind `handle`, unlink it, free its slot
    ///
    /// Unlinking from the live list is O(1) thanks to the back links.
    pub fn deallocate(&mut self, handle: Handle) -> MemResult<T> {
        let idx = self.slot_index(handle)?;
        let value = self.values[idx].take().ok_or(MemError::InvalidHandle)?;

        // Unlink from the live list
        let (p, n) = (self.prev[idx], self.next[idx]);
        if p == EOL {
            self.live_front = n;
        } else {
            self.next[p as usize] = n;
        }
        if n != EOL {
            self.prev[n as usize] = p;
        }
        self.live_count -= 1;

        // Push onto the free chain
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.next[idx] = self.free_front;
        self.prev[idx] = EOL;
        self.free_front = idx as u16;
        Ok(value)
    }

    /// Resolve a handle to a transient mutable reference
    pub fn lock(&mut self, handle: Handle) -> MemResult<&mut T> {
        let idx = self.slot_index(handle)?;
        self.values[idx].as_mut().ok_or(MemError::InvalidHandle)
    }

    /// Release a reference obtained from `lock`; a no-op here
    #[inline]
    pub fn unlock(&self, _handle: Handle) {}

    /// Iterate the live slots, most recently allocated first
    pub fn iter_live(&self) -> LiveIter<'_, T, N> {
        LiveIter { pool: self, cursor: self.live_front }
    }

    /// Number of free slots. O(1) from the live count.
    #[inline]
    pub fn count_free(&self) -> usize {
        N - self.live_count
    }

    /// Number of currently allocated slots. O(1).
    #[inline]
    pub fn count_allocated(&self) -> usize {
        self.live_count
    }

    /// True exactly when the free list is empty. O(1).
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.free_front == EOL
    }

    /// Total number of slots
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    fn slot_index(&self, handle: Handle) -> MemResult<usize> {
        let idx = handle.index();
        if idx >= N || self.generations[idx] != handle.generation() {
            return Err(MemError::InvalidHandle);
        }
        Ok(idx)
    }

    /// Walk both lists and panic on any broken invariant
    ///
    /// Bring-up and test aid, not a production path.
    #[cfg(feature = "debug-assertions")]
    pub fn debug_validate(&self) {
        let mut free = 0usize;
        let mut cursor = self.free_front;
        while cursor != EOL {
            let idx = cursor as usize;
            assert!(idx < N, "free link {idx} out of range");
            assert!(self.values[idx].is_none(), "free slot {idx} holds a value");
            free += 1;
            assert!(free <= N, "free chain has a cycle");
            cursor = self.next[idx];
        }

        let mut live = 0usize;
        let mut prev = EOL;
        let mut cursor = self.live_front;
        while cursor != EOL {
            let idx = cursor as usize;
            assert!(idx < N, "live link {idx} out of range");
            assert!(self.values[idx].is_some(), "live slot {idx} is empty");
            assert_eq!(self.prev[idx], prev, "live back link broken at {idx}");
            live += 1;
            assert!(live <= N, "live list has a cycle");
            prev = cursor;
            cursor = self.next[idx];
        }

        assert_eq!(live, self.live_count, "live count out of sync");
        assert_eq!(free + live, N, "slot partition broken");
    }
}

impl<T, const N: usize> Default for TrackedSlotPool<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a pool's live slots in most-recently-allocated order
pub struct LiveIter<'a, T, const N: usize> {
    pool: &'a TrackedSlotPool<T, N>,
    cursor: u16,
}

impl<'a, T, const N: usize> Iterator for LiveIter<'a, T, N> {
    type Item = (Handle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor != EOL {
            let idx = self.cursor as usize;
            self.cursor = self.pool.next[idx];
            if let Some(value) = self.pool.values[idx].as_ref() {
                let handle = Handle::new(idx as u16, self.pool.generations[idx]);
                return Some((handle, value));
            }
        }
        None
    }
}
