//! OS-backed storage regions
//!
//! Platform-specific implementations provide page-aligned, optionally
//! guard-fenced byte spans suitable as arena or buffer backing stores.

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod unix;
        pub use unix::Region;
    } else {
        compile_error!("memkit-platform currently supports Unix targets only");
    }
}

/// Size of a virtual memory page on this host.
pub fn page_size() -> usize {
    let n = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if n > 0 {
        n as usize
    } else {
        4096
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_sane() {
        let page = page_size();
        assert!(page >= 4096);
        assert!(page.is_power_of_two());
    }
}
