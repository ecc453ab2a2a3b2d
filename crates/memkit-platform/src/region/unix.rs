//! Unix region implementation using mmap
//!
//! The whole mapping is created read-write, then the fence pages (when
//! configured) are flipped to `PROT_NONE` with `mprotect`. A stray access
//! off either end of the usable span faults immediately instead of
//! corrupting whatever happens to be mapped next.

use std::ffi::c_void;
use std::fmt;
use std::num::NonZeroUsize;
use std::ptr::{self, NonNull};

use nix::sys::mman::{madvise, mmap_anonymous, mprotect, munmap, MapFlags, MmapAdvise, ProtFlags};

use memkit_core::chunk::{ChunkRead, ChunkWrite};
use memkit_core::error::RegionError;
use memkit_core::kdebug;

use super::page_size;
use crate::config::RegionConfig;

/// A page-aligned byte span obtained from `mmap`
///
/// The mapping is exclusively owned; dropping the region unmaps it. With
/// `guard_pages` enabled the usable span is fenced by one inaccessible
/// page on each side. The usable span implements `AsRef<[u8]>` /
/// `AsMut<[u8]>` and the chunk traits, so a region can back an `Arena`,
/// a `CursorChunk`, or a netbuf directly.
pub struct Region {
    /// Start of the whole mapping, fence pages included
    base: NonNull<c_void>,
    /// Length of the whole mapping in bytes
    map_len: usize,
    /// Length of the usable span in bytes (a whole number of pages)
    usable_len: usize,
    /// Offset from `base` to the usable span (one page when fenced)
    offset: usize,
}

// The mapping is exclusively owned for the region's lifetime; shared
// access only hands out `&[u8]`.
unsafe impl Send for Region {}
unsafe impl Sync for Region {}

impl Region {
    /// Map a new region according to `config`.
    ///
    /// The usable capacity is `config.bytes` rounded up to a whole number
    /// of pages.
    pub fn new(config: RegionConfig) -> Result<Self, RegionError> {
        config.validate()?;

        let page = page_size();
        let usable_len = config
            .bytes
            .checked_add(page - 1)
            .ok_or(RegionError::Map(libc::ENOMEM))?
            / page
            * page;
        let fence = if config.guard_pages { page } else { 0 };
        let map_len = usable_len
            .checked_add(2 * fence)
            .ok_or(RegionError::Map(libc::ENOMEM))?;

        let length = NonZeroUsize::new(map_len).ok_or(RegionError::ZeroLength)?;
        // SAFETY: anonymous private mapping with no fixed address; the
        // kernel picks a fresh span, so no existing memory is aliased.
        let base = unsafe {
            mmap_anonymous(
                None,
                length,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_PRIVATE,
            )
        }
        .map_err(|e| RegionError::Map(e as i32))?;

        if config.guard_pages {
            // SAFETY: both fence pages lie inside the mapping just created.
            let armed = unsafe {
                let high = base.cast::<u8>().add(fence + usable_len).cast::<c_void>();
                mprotect(base, page, ProtFlags::PROT_NONE)
                    .and_then(|()| mprotect(high, page, ProtFlags::PROT_NONE))
            };
            if let Err(e) = armed {
                // SAFETY: unmapping the mapping created above; no Region
                // owns it yet, so this is the only release.
                unsafe {
                    let _ = munmap(base, map_len);
                }
                return Err(RegionError::Protect(e as i32));
            }
        }

        let region = Self {
            base,
            map_len,
            usable_len,
            offset: fence,
        };

        if config.populate {
            // Touch every page once so no fault is taken on first use.
            let p = region.usable_ptr().as_ptr();
            for off in (0..usable_len).step_by(page) {
                // SAFETY: each offset is inside the usable span.
                unsafe { ptr::write_volatile(p.add(off), 0) };
            }
        }

        kdebug!(
            "mapped region: {} usable bytes, {} mapped, guards={}",
            usable_len,
            map_len,
            config.guard_pages
        );

        Ok(region)
    }

    /// Map a region of at least `bytes` usable bytes with default settings.
    pub fn with_capacity(bytes: usize) -> Result<Self, RegionError> {
        Self::new(RegionConfig::new().bytes(bytes))
    }

    /// Usable capacity in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.usable_len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.usable_len == 0
    }

    /// Whether fence pages are armed around the usable span.
    #[inline]
    pub fn is_guarded(&self) -> bool {
        self.offset != 0
    }

    /// Release the physical pages behind the usable span.
    ///
    /// The virtual span stays mapped and accessible; the kernel hands back
    /// zero-filled pages on the next touch. Contents are lost.
    pub fn reset_commit(&mut self) -> Result<(), RegionError> {
        // SAFETY: the span lies inside our own mapping.
        unsafe {
            madvise(
                self.usable_ptr().cast::<c_void>(),
                self.usable_len,
                MmapAdvise::MADV_DONTNEED,
            )
        }
        .map_err(|e| RegionError::Advise(e as i32))
    }

    /// Start of the usable span.
    #[inline]
    fn usable_ptr(&self) -> NonNull<u8> {
        // SAFETY: offset is zero or one page, always inside the mapping.
        unsafe { self.base.cast::<u8>().add(self.offset) }
    }
}

impl AsRef<[u8]> for Region {
    fn as_ref(&self) -> &[u8] {
        // SAFETY: the usable span stays mapped readable for the region's
        // whole lifetime.
        unsafe { std::slice::from_raw_parts(self.usable_ptr().as_ptr(), self.usable_len) }
    }
}

impl AsMut<[u8]> for Region {
    fn as_mut(&mut self) -> &mut [u8] {
        // SAFETY: exclusive borrow of an exclusively owned mapping.
        unsafe { std::slice::from_raw_parts_mut(self.usable_ptr().as_ptr(), self.usable_len) }
    }
}

impl ChunkRead for Region {
    #[inline]
    fn data(&self) -> &[u8] {
        self.as_ref()
    }
}

impl ChunkWrite for Region {
    #[inline]
    fn data_mut(&mut self) -> &mut [u8] {
        self.as_mut()
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("usable_len", &self.usable_len)
            .field("map_len", &self.map_len)
            .field("guarded", &self.is_guarded())
            .finish()
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        // SAFETY: unmapping the mapping we created; nothing aliases it now.
        unsafe {
            let _ = munmap(self.base, self.map_len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memkit_core::{Arena, CursorChunk};

    #[test]
    fn test_roundtrip() {
        let mut region = Region::with_capacity(8 * 1024).unwrap();
        assert!(region.is_guarded());

        // Write a pattern across the whole span, read it back.
        let len = region.len();
        for (i, b) in region.as_mut().iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
        assert_eq!(region.as_ref()[0], 0);
        assert_eq!(region.as_ref()[len - 1], ((len - 1) % 251) as u8);
    }

    #[test]
    fn test_rounds_up_to_page() {
        let region = Region::with_capacity(1).unwrap();
        let page = page_size();
        assert_eq!(region.len(), page);
        assert_eq!(region.len() % page, 0);
    }

    #[test]
    fn test_zero_length_rejected() {
        let err = Region::new(RegionConfig::new().bytes(0));
        assert!(matches!(err, Err(RegionError::ZeroLength)));
    }

    #[test]
    fn test_unguarded_edges_writable() {
        let mut region = Region::new(RegionConfig::new().bytes(4096).guard_pages(false)).unwrap();
        assert!(!region.is_guarded());

        let len = region.len();
        region.as_mut()[0] = 0xAA;
        region.as_mut()[len - 1] = 0xBB;
        assert_eq!(region.as_ref()[0], 0xAA);
        assert_eq!(region.as_ref()[len - 1], 0xBB);
    }

    #[test]
    fn test_populate_starts_zeroed() {
        let region = Region::new(RegionConfig::new().bytes(16 * 1024).populate(true)).unwrap();
        assert!(region.as_ref().iter().all(|&b| b == 0));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_reset_commit_zeroes() {
        let mut region = Region::with_capacity(4096).unwrap();
        region.as_mut().fill(0x5A);
        assert_eq!(region.as_ref()[100], 0x5A);

        region.reset_commit().unwrap();
        assert!(region.as_ref().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_backs_an_arena() {
        let region = Region::with_capacity(4096).unwrap();
        let mut arena = Arena::new(region);

        let a = arena.alloc(100).unwrap();
        arena.get_mut(a).unwrap().fill(7);
        assert!(arena.get(a).unwrap().iter().all(|&b| b == 7));
        assert_eq!(arena.free(a).unwrap(), 104);
    }

    #[test]
    fn test_backs_a_cursor() {
        let region = Region::with_capacity(4096).unwrap();
        let len = region.len();
        let mut cursor = CursorChunk::new(region);

        cursor.advance(64).unwrap();
        assert_eq!(cursor.length_processed(), 64);
        assert_eq!(cursor.length_unprocessed(), len - 64);
    }
}
