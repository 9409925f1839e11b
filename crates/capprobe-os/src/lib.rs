// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! capprobe_os - OS plumbing for memory probing
//!
//! Thin wrappers over the handful of syscalls a capacity probe needs:
//!
//! - [`free_memory`] reads free RAM via `sysinfo(2)`
//! - [`trim_heap`] asks the allocator to hand freed pages back (`malloc_trim(3)`)
//! - [`limit_address_space`] lowers `RLIMIT_AS` so that allocation failures
//!   are reported to the caller instead of summoning the OOM killer
//! - [`AddressSpaceCeiling`] lowers it temporarily and restores it on drop
//! - [`idle`] sleeps via `nanosleep(2)` and reports signal interruption
//!
//! Every function degrades gracefully on platforms without the syscall:
//! snapshots become `None`, hints return `false`, limits report
//! [`LimitError::Unsupported`].

#![warn(missing_docs)]

mod error;
mod heap;
mod idle;
mod limit;
mod snapshot;

#[cfg(test)]
mod tests;

pub use error::{IdleError, LimitError};
pub use heap::trim_heap;
pub use idle::idle;
pub use limit::{
    AddressSpaceCeiling, address_space_limit, address_space_usage, limit_address_space,
};
pub use snapshot::{MemorySnapshot, free_memory};
