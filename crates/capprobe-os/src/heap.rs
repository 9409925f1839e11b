// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

/// Asks the allocator to return freed heap pages to the OS.
///
/// Advisory only. Returns `true` if the allocator reported that memory was
/// released, `false` if nothing was released or the platform has no such
/// hook. Callers must not depend on the outcome for correctness.
#[inline]
pub fn trim_heap() -> bool {
    malloc_trim()
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
fn malloc_trim() -> bool {
    // SAFETY: malloc_trim only walks glibc's own arenas
    unsafe { libc::malloc_trim(0) == 1 }
}

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
fn malloc_trim() -> bool {
    // malloc_trim is a glibc extension
    false
}
