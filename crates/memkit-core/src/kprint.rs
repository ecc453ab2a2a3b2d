//! Kernel-style print macros for memkit
//!
//! Leveled, optionally-flushing diagnostics on stderr, in the spirit of
//! the kernel's printk. Allocator hot paths never log; these macros are
//! for bring-up, demos, and the platform layer.
//!
//! # Environment Variables
//!
//! - `MEMKIT_LOG_LEVEL=<level>` - off, error, warn, info, debug, trace (or 0-5)
//! - `MEMKIT_FLUSH_EPRINT=1` - flush stderr after each print (useful when chasing crashes)
//!
//! # Usage
//!
//! ```ignore
//! use memkit_core::{kprintln, kdebug, kinfo, kwarn, kerror};
//!
//! kprintln!("plain message");
//! kinfo!("region of {} bytes mapped", len);
//! kwarn!("guard pages disabled");
//! kdebug!("arena top now {}", top);
//! kerror!("mmap failed: {}", err);
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::env::env_get_bool;

/// Log levels, most severe first
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Parse a level name or digit, `None` for anything unrecognized
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "1" => Some(LogLevel::Error),
            "warn" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Bracketed tag, padded so messages line up
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[ERROR]",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Info => "[INFO] ",
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Trace => "[TRACE]",
        }
    }
}

// Global state, initialized once from the environment
static LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static FLUSH: AtomicBool = AtomicBool::new(false);
static READY: AtomicBool = AtomicBool::new(false);

/// Initialize logging from environment variables
///
/// Runs automatically on the first log call; call it explicitly from a
/// binary's main for deterministic setup.
pub fn init() {
    if READY.swap(true, Ordering::SeqCst) {
        return; // already initialized
    }

    FLUSH.store(env_get_bool("MEMKIT_FLUSH_EPRINT", false), Ordering::Relaxed);

    if let Ok(val) = std::env::var("MEMKIT_LOG_LEVEL") {
        let level = LogLevel::parse(&val).unwrap_or(LogLevel::Info);
        LEVEL.store(level as u8, Ordering::Relaxed);
    }
}

/// Current log level
#[inline]
pub fn log_level() -> LogLevel {
    if !READY.load(Ordering::Relaxed) {
        init();
    }
    LogLevel::from_u8(LEVEL.load(Ordering::Relaxed))
}

/// Override the log level at runtime
pub fn set_log_level(level: LogLevel) {
    LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Whether stderr is flushed after each print
#[inline]
pub fn flush_enabled() -> bool {
    if !READY.load(Ordering::Relaxed) {
        init();
    }
    FLUSH.load(Ordering::Relaxed)
}

/// Override the flush mode at runtime
pub fn set_flush_enabled(enabled: bool) {
    FLUSH.store(enabled, Ordering::Relaxed);
}

/// Check whether messages at `level` would be emitted
#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    level as u8 <= log_level() as u8
}

/// Internal: write and optionally flush
///
/// Holds the stderr lock so a line is never interleaved.
#[doc(hidden)]
pub fn _emit(args: std::fmt::Arguments<'_>) {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = handle.write_fmt(args);
    if flush_enabled() {
        let _ = handle.flush();
    }
}

/// Internal: write with newline and optionally flush
#[doc(hidden)]
pub fn _emit_line(args: std::fmt::Arguments<'_>) {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");
    if flush_enabled() {
        let _ = handle.flush();
    }
}

/// Internal: leveled write with tag prefix
#[doc(hidden)]
pub fn _emit_leveled(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = write!(handle, "{} ", level.tag());
    let _ = handle.write_fmt(args);
    let _ = handle.write_all(b"\n");
    if flush_enabled() {
        let _ = handle.flush();
    }
}

/// Print to stderr (no newline), with optional auto-flush
#[macro_export]
macro_rules! kprint {
    ($($arg:tt)*) => {{
        $crate::kprint::_emit(format_args!($($arg)*));
    }};
}

/// Print to stderr with newline, with optional auto-flush
#[macro_export]
macro_rules! kprintln {
    () => {{
        $crate::kprint::_emit_line(format_args!(""));
    }};
    ($($arg:tt)*) => {{
        $crate::kprint::_emit_line(format_args!($($arg)*));
    }};
}

/// Error level log (shown unless logging is off)
#[macro_export]
macro_rules! kerror {
    ($($arg:tt)*) => {{
        $crate::kprint::_emit_leveled(
            $crate::kprint::LogLevel::Error,
            format_args!($($arg)*)
        );
    }};
}

/// Warning level log
#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => {{
        $crate::kprint::_emit_leveled(
            $crate::kprint::LogLevel::Warn,
            format_args!($($arg)*)
        );
    }};
}

/// Info level log
#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => {{
        $crate::kprint::_emit_leveled(
            $crate::kprint::LogLevel::Info,
            format_args!($($arg)*)
        );
    }};
}

/// Debug level log
#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => {{
        $crate::kprint::_emit_leveled(
            $crate::kprint::LogLevel::Debug,
            format_args!($($arg)*)
        );
    }};
}

/// Trace level log (most verbose)
#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => {{
        $crate::kprint::_emit_leveled(
            $crate::kprint::LogLevel::Trace,
            format_args!($($arg)*)
        );
    }};
}
