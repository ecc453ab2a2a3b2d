//! Fixed-capacity slot pool with handle-based access
//!
//! Stores values in a fixed array and hands out small integer handles
//! instead of references. Free slots form a LIFO chain through a parallel
//! array of index links, so a just-freed slot is the next one reused
//! (cache-friendly) and no slot bytes are ever reinterpreted as links.
//! Handles carry a per-slot generation stamp; a handle kept past its
//! `deallocate` is rejected with `InvalidHandle` instead of silently
//! aliasing the slot's next occupant.

use core::array;

use crate::constants::EOL;
use crate::error::{MemError, MemResult};
use crate::handle::Handle;

/// Fixed-capacity pool of `N` value slots
///
/// All storage is embedded, so a pool can live in a `static` or on the
/// stack. `N` must stay below `u16::MAX`; the top index is the free-list
/// sentinel.
pub struct SlotPool<T, const N: usize> {
    /// Value storage, `Some` exactly while the slot is allocated
    values: [Option<T>; N],

    /// Free-list links by slot index, `EOL` terminated
    links: [u16; N],

    /// Generation stamp per slot, bumped on every deallocate
    generations: [u16; N],

    /// Index of the first free slot, `EOL` when exhausted
    front: u16,
}

impl<T, const N: usize> SlotPool<T, N> {
    /// Create a pool with every slot free
    ///
    /// The initial free chain runs in index order (0 → 1 → … → N-1), so
    /// the first allocations come out with indices 0, 1, 2…
    pub fn new() -> Self {
        assert!(N < EOL as usize, "pool capacity must be below u16::MAX");

        let mut links = [EOL; N];
        for (i, link) in links.iter_mut().enumerate() {
            let next = i + 1;
            *link = if next == N { EOL } else { next as u16 };
        }

        Self {
            values: array::from_fn(|_| None),
            links,
            generations: [0; N],
            front: if N == 0 { EOL } else { 0 },
        }
    }

    /// Take the front free slot, store `value` in it, return its handle
    ///
    /// Fails with `Exhausted` when the free list is empty. O(1).
    pub fn allocate(&mut self, value: T) -> MemResult<Handle> {
        if self.front == EOL {
            return Err(MemError::Exhausted);
        }

        let idx = self.front as usize;
        self.front = self.links[idx];
        self.links[idx] = EOL;
        self.values[idx] = Some(value);
        Ok(Handle::new(idx as u16, self.generations[idx]))
    }

    /// Remove the value behind `handle` and push its slot on the free list
    ///
    /// The slot's generation is bumped, so the handle (and any copy of it)
    /// is dead from here on. LIFO reuse: this slot is the next one
    /// `allocate` returns. O(1).
    pub fn deallocate(&mut self, handle: Handle) -> MemResult<T> {
        let idx = self.slot_index(handle)?;
        let value = self.values[idx].take().ok_or(MemError::InvalidHandle)?;

        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.links[idx] = self.front;
        self.front = idx as u16;
        Ok(value)
    }

    /// Resolve a handle to a transient mutable reference
    ///
    /// Fails with `InvalidHandle` when the index is out of range, the slot
    /// is free, or the generation does not match.
    pub fn lock(&mut self, handle: Handle) -> MemResult<&mut T> {
        let idx = self.slot_index(handle)?;
        self.values[idx].as_mut().ok_or(MemError::InvalidHandle)
    }

    /// Release a reference obtained from `lock`
    ///
    /// A no-op for this array-backed pool. The call only exists so a
    /// future relocating/compacting pool can invalidate outstanding
    /// addresses without changing callers; it is not a concurrency lock.
    #[inline]
    pub fn unlock(&self, _handle: Handle) {}

    /// Number of free slots, counted by walking the free chain. O(n).
    pub fn count_free(&self) -> usize {
        let mut n = 0;
        let mut cursor = self.front;
        while cursor != EOL {
            n += 1;
            cursor = self.links[cursor as usize];
        }
        n
    }

    /// Number of currently allocated slots. O(n).
    pub fn count_allocated(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// True exactly when the free list is empty. O(1).
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.front == EOL
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

    /// Walk both partitions and panic on any broken invariant
    ///
    /// Bring-up and test aid, not a production path.
    #[cfg(feature = "debug-assertions")]
    pub fn debug_validate(&self) {
        let mut free = 0usize;
        let mut cursor = self.front;
        while cursor != EOL {
            let idx = cursor as usize;
            assert!(idx < N, "free link {idx} out of range");
            assert!(self.values[idx].is_none(), "free slot {idx} holds a value");
            free += 1;
            assert!(free <= N, "free chain has a cycle");
            cursor = self.links[idx];
        }
        assert_eq!(free + self.count_allocated(), N, "slot partition broken");
    }
}

impl<T, const N: usize> Default for SlotPool<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_sequential() {
        let mut pool: SlotPool<u32, 100> = SlotPool::new();

        let h1 = pool.allocate(10).unwrap();
        let h2 = pool.allocate(20).unwrap();
        let h3 = pool.allocate(30).unwrap();

        assert_eq!(h1.index(), 0);
        assert_eq!(h2.index(), 1);
        assert_eq!(h3.index(), 2);
        assert_eq!(pool.count_allocated(), 3);
        assert_eq!(pool.count_free(), 97);
    }

    #[test]
    fn test_allocate_release_reuse() {
        let mut pool: SlotPool<u32, 10> = SlotPool::new();

        let h1 = pool.allocate(1).unwrap();
        let h2 = pool.allocate(2).unwrap();
        assert_eq!(h1.index(), 0);
        assert_eq!(h2.index(), 1);

        // Release the first slot
        assert_eq!(pool.deallocate(h1).unwrap(), 1);

        // Next allocation reuses slot 0 (LIFO), under a fresh generation
        let h3 = pool.allocate(3).unwrap();
        assert_eq!(h3.index(), 0);
        assert_ne!(h3, h1);
        assert_eq!(h3.generation(), h1.generation() + 1);
    }

    #[test]
    fn test_allocate_exhaustion() {
        let mut pool: SlotPool<u8, 3> = SlotPool::new();

        let _h1 = pool.allocate(1).unwrap();
        let _h2 = pool.allocate(2).unwrap();
        let h3 = pool.allocate(3).unwrap();
        assert!(pool.is_exhausted());

        // Should fail - no slots left
        let result = pool.allocate(4);
        assert!(matches!(result, Err(MemError::Exhausted)));

        // Freeing one makes room again
        pool.deallocate(h3).unwrap();
        assert!(!pool.is_exhausted());
        assert!(pool.allocate(5).is_ok());
    }

    #[test]
    fn test_partition_invariant() {
        let mut pool: SlotPool<u32, 8> = SlotPool::new();
        let mut handles = Vec::new();

        assert_eq!(pool.count_free() + pool.count_allocated(), 8);

        for i in 0..8 {
            handles.push(pool.allocate(i).unwrap());
            assert_eq!(pool.count_free() + pool.count_allocated(), 8);
        }

        // Free every other handle, checking the partition after each call
        for h in handles.iter().step_by(2) {
            pool.deallocate(*h).unwrap();
            assert_eq!(pool.count_free() + pool.count_allocated(), 8);
        }

        assert_eq!(pool.count_free(), 4);
        assert_eq!(pool.count_allocated(), 4);
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut pool: SlotPool<u32, 4> = SlotPool::new();

        let h = pool.allocate(7).unwrap();
        pool.deallocate(h).unwrap();

        // Both access paths reject the stale handle
        assert!(matches!(pool.lock(h), Err(MemError::InvalidHandle)));
        assert!(matches!(pool.deallocate(h), Err(MemError::InvalidHandle)));

        // The reused slot is unaffected
        let h2 = pool.allocate(9).unwrap();
        assert_eq!(h2.index(), h.index());
        assert!(matches!(pool.lock(h), Err(MemError::InvalidHandle)));
        assert_eq!(*pool.lock(h2).unwrap(), 9);
    }

    #[test]
    fn test_lock_mutates_in_place() {
        let mut pool: SlotPool<String, 4> = SlotPool::new();

        let h = pool.allocate(String::from("abc")).unwrap();
        pool.lock(h).unwrap().push_str("def");
        pool.unlock(h);

        assert_eq!(pool.deallocate(h).unwrap(), "abcdef");
    }

    #[test]
    fn test_lock_out_of_range() {
        let mut pool: SlotPool<u32, 4> = SlotPool::new();
        let _ = pool.allocate(1).unwrap();

        assert!(matches!(pool.lock(Handle::NONE), Err(MemError::InvalidHandle)));
        assert!(matches!(pool.lock(Handle::new(99, 0)), Err(MemError::InvalidHandle)));
        // Right index, wrong generation
        assert!(matches!(pool.lock(Handle::new(0, 5)), Err(MemError::InvalidHandle)));
    }

    #[test]
    fn test_initial_chain_order() {
        let mut pool: SlotPool<usize, 5> = SlotPool::new();
        for expected in 0..5 {
            let h = pool.allocate(expected).unwrap();
            assert_eq!(h.index(), expected);
        }
    }

    #[cfg(feature = "debug-assertions")]
    #[test]
    fn test_debug_validate() {
        let mut pool: SlotPool<u32, 6> = SlotPool::new();
        pool.debug_validate();

        let h1 = pool.allocate(1).unwrap();
        let _h2 = pool.allocate(2).unwrap();
        pool.debug_validate();

        pool.deallocate(h1).unwrap();
        pool.debug_validate();
    }
}
