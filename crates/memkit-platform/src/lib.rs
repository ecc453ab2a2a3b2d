//! # memkit-platform
//!
//! OS-backed storage for the memkit allocators.
//!
//! This crate provides:
//! - `Region`: page-aligned mmap-backed byte spans
//! - Optional `PROT_NONE` fence pages on both sides of a span
//! - Commit release via `madvise` for long-lived regions
//! - `RegionConfig`: env-overridable region settings
//!
//! Everything in `memkit-core` works over plain arrays; this crate is only
//! needed when storage should come from the OS instead of the stack or an
//! executable's data segment.

#![allow(dead_code)]

pub mod config;
pub mod region;

// Re-exports
pub use config::RegionConfig;
pub use region::{page_size, Region};
