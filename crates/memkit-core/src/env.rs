//! Environment variable helpers
//!
//! Small typed wrappers over `std::env::var` used by the logging setup,
//! the platform configuration, and the demo binaries.
//!
//! # Usage
//!
//! ```ignore
//! use memkit_core::env::{env_get, env_get_bool, env_get_opt};
//!
//! let bytes: usize = env_get("MEMKIT_REGION_BYTES", 64 * 1024);
//! let guards: bool = env_get_bool("MEMKIT_GUARD_PAGES", true);
//! let rounds: Option<u64> = env_get_opt("MEMKIT_BENCH_ROUNDS");
//! ```

use std::str::FromStr;

/// Environment variable parsed as `T`, or the default
///
/// Unset and unparseable values both fall back to the default.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Environment variable as a boolean
///
/// "1", "true", "yes", "on" (case-insensitive) count as true; any other
/// set value is false; unset returns the default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

/// Environment variable parsed as `T`, `None` when unset or unparseable
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_returns_default() {
        let val: usize = env_get("__MEMKIT_TEST_UNSET__", 42);
        assert_eq!(val, 42);

        assert!(env_get_bool("__MEMKIT_TEST_UNSET__", true));
        assert!(!env_get_bool("__MEMKIT_TEST_UNSET__", false));

        let val: Option<usize> = env_get_opt("__MEMKIT_TEST_UNSET__");
        assert!(val.is_none());
    }

    #[test]
    fn test_set_and_parse() {
        std::env::set_var("__MEMKIT_TEST_NUM__", "123");
        let val: usize = env_get("__MEMKIT_TEST_NUM__", 0);
        assert_eq!(val, 123);
        let opt: Option<u64> = env_get_opt("__MEMKIT_TEST_NUM__");
        assert_eq!(opt, Some(123));
        std::env::remove_var("__MEMKIT_TEST_NUM__");
    }

    #[test]
    fn test_parse_failure_falls_back() {
        std::env::set_var("__MEMKIT_TEST_BAD__", "not_a_number");
        let val: usize = env_get("__MEMKIT_TEST_BAD__", 99);
        assert_eq!(val, 99);
        let opt: Option<usize> = env_get_opt("__MEMKIT_TEST_BAD__");
        assert!(opt.is_none());
        std::env::remove_var("__MEMKIT_TEST_BAD__");
    }

    #[test]
    fn test_bool_variants() {
        for truthy in ["1", "true", "YES", "on"] {
            std::env::set_var("__MEMKIT_TEST_BOOL__", truthy);
            assert!(env_get_bool("__MEMKIT_TEST_BOOL__", false), "{truthy} should be true");
        }
        for falsy in ["0", "false", "garbage"] {
            std::env::set_var("__MEMKIT_TEST_BOOL__", falsy);
            assert!(!env_get_bool("__MEMKIT_TEST_BOOL__", true), "{falsy} should be false");
        }
        std::env::remove_var("__MEMKIT_TEST_BOOL__");
    }
}
