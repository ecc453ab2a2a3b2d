//! Region configuration
//!
//! All values can be overridden via environment variables:
//! - `MEMKIT_REGION_BYTES`: usable capacity of the region in bytes
//! - `MEMKIT_GUARD_PAGES`: arm inaccessible guard pages on both sides (true/false)
//! - `MEMKIT_POPULATE`: pre-fault every page at creation time (true/false)

use memkit_core::error::RegionError;
use memkit_core::{env_get, env_get_bool};

/// Default values for region configuration
pub mod defaults {
    /// Usable capacity: 64 KiB
    pub const REGION_BYTES: usize = 64 * 1024;

    /// Guard pages armed by default
    pub const GUARD_PAGES: bool = true;

    /// Pages faulted lazily by default
    pub const POPULATE: bool = false;
}

/// Configuration for an OS-backed storage region
#[derive(Debug, Clone)]
pub struct RegionConfig {
    /// Usable capacity in bytes (rounded up to a whole number of pages)
    pub bytes: usize,

    /// Place a `PROT_NONE` page immediately below and above the usable
    /// span, so a stray write off either end faults instead of corrupting
    /// a neighbour
    pub guard_pages: bool,

    /// Touch every page once at creation so no fault is taken later
    pub populate: bool,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionConfig {
    /// Create config with explicit defaults (no env override).
    pub fn new() -> Self {
        Self {
            bytes: defaults::REGION_BYTES,
            guard_pages: defaults::GUARD_PAGES,
            populate: defaults::POPULATE,
        }
    }

    /// Create configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            bytes: env_get("MEMKIT_REGION_BYTES", defaults::REGION_BYTES),
            guard_pages: env_get_bool("MEMKIT_GUARD_PAGES", defaults::GUARD_PAGES),
            populate: env_get_bool("MEMKIT_POPULATE", defaults::POPULATE),
        }
    }

    // Builder methods

    pub fn bytes(mut self, n: usize) -> Self {
        self.bytes = n;
        self
    }

    pub fn guard_pages(mut self, enable: bool) -> Self {
        self.guard_pages = enable;
        self
    }

    pub fn populate(mut self, enable: bool) -> Self {
        self.populate = enable;
        self
    }

    /// Validate configuration and return an error if invalid.
    pub fn validate(&self) -> Result<(), RegionError> {
        if self.bytes == 0 {
            return Err(RegionError::ZeroLength);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env() {
        let config = RegionConfig::from_env();
        assert!(config.bytes >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RegionConfig::new()
            .bytes(256 * 1024)
            .guard_pages(false)
            .populate(true);

        assert_eq!(config.bytes, 256 * 1024);
        assert!(!config.guard_pages);
        assert!(config.populate);
    }

    #[test]
    fn test_validation() {
        let config = RegionConfig::new().bytes(0);
        assert!(matches!(config.validate(), Err(RegionError::ZeroLength)));
    }
}
