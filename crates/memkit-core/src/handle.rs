//! Pool handle type

use core::fmt;

use crate::constants::HANDLE_NONE;

/// Handle to one slot in a pool
///
/// Packs a 16-bit slot index and a 16-bit generation counter into one
/// 32-bit value. The generation is bumped every time the slot is freed, so
/// a handle held past `deallocate` is detected instead of silently aliasing
/// a later allocation. The maximum packed value (u32::MAX) is reserved as a
/// sentinel for "no handle"; index 0xFFFF is therefore never issued and
/// pool capacity stays below it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Handle(u32);

impl Handle {
    /// Sentinel value indicating no handle
    pub const NONE: Handle = Handle(HANDLE_NONE);

    /// Pack an index and generation into a handle
    #[inline]
    pub const fn new(index: u16, generation: u16) -> Self {
        Handle(((generation as u32) << 16) | index as u32)
    }

    /// Slot index part, as usize for direct indexing
    #[inline]
    pub const fn index(self) -> usize {
        (self.0 & 0xFFFF) as usize
    }

    /// Generation part
    #[inline]
    pub const fn generation(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Raw packed value
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Check if this is the NONE sentinel
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == HANDLE_NONE
    }

    /// Check if this is a real handle
    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != HANDLE_NONE
    }

    /// Convert to Option
    #[inline]
    pub const fn to_option(self) -> Option<Handle> {
        if self.is_none() {
            None
        } else {
            Some(self)
        }
    }
}

impl From<u32> for Handle {
    #[inline]
    fn from(raw: u32) -> Self {
        Handle(raw)
    }
}

impl From<Handle> for u32 {
    #[inline]
    fn from(h: Handle) -> Self {
        h.0
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "Handle(NONE)")
        } else {
            write!(f, "Handle({}@{})", self.index(), self.generation())
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "none")
        } else {
            write!(f, "{}@{}", self.index(), self.generation())
        }
    }
}

impl Default for Handle {
    fn default() -> Self {
        Handle::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_basics() {
        let h = Handle::new(42, 7);
        assert_eq!(h.index(), 42);
        assert_eq!(h.generation(), 7);
        assert!(!h.is_none());
        assert!(h.is_some());
    }

    #[test]
    fn test_handle_none() {
        let none = Handle::NONE;
        assert!(none.is_none());
        assert!(!none.is_some());
        assert_eq!(none.to_option(), None);
        assert_eq!(Handle::default(), Handle::NONE);
    }

    #[test]
    fn test_handle_pack_roundtrip() {
        let h = Handle::new(0x1234, 0xABCD);
        let raw: u32 = h.into();
        assert_eq!(raw, 0xABCD_1234);
        let back: Handle = raw.into();
        assert_eq!(back, h);
    }

    #[test]
    fn test_handle_generations_differ() {
        let a = Handle::new(3, 0);
        let b = Handle::new(3, 1);
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(format!("{}", Handle::new(5, 2)), "5@2");
        assert_eq!(format!("{}", Handle::NONE), "none");
        assert_eq!(format!("{:?}", Handle::NONE), "Handle(NONE)");
    }
}
