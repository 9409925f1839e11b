// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Point-in-time read of free memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySnapshot {
    free_bytes: u64,
}

impl MemorySnapshot {
    /// Wraps a free-byte count.
    pub fn from_free_bytes(free_bytes: u64) -> Self {
        Self { free_bytes }
    }

    /// Free memory in bytes.
    pub fn free_bytes(&self) -> u64 {
        self.free_bytes
    }

    /// Free memory in whole mebibytes (bytes / 1024 / 1024, truncated).
    pub fn mebibytes(&self) -> u64 {
        self.free_bytes / BYTES_PER_MIB
    }
}

/// Returns the amount of free RAM, or `None` if it cannot be read.
///
/// Values read right after [`crate::trim_heap`] are approximate: trimming
/// is a hint and other processes allocate concurrently.
///
/// # Example
///
/// ```
/// use capprobe_os::free_memory;
///
/// match free_memory() {
///     Some(snapshot) => println!("{} MiB free", snapshot.mebibytes()),
///     None => println!("free memory unavailable"),
/// }
/// ```
pub fn free_memory() -> Option<MemorySnapshot> {
    sysinfo_free_bytes().map(MemorySnapshot::from_free_bytes)
}

#[cfg(target_os = "linux")]
fn sysinfo_free_bytes() -> Option<u64> {
    // SAFETY: sysinfo is plain-old-data; all-zero is a valid bit pattern
    let mut info: libc::sysinfo = unsafe { core::mem::zeroed() };

    // SAFETY: info is a valid, writable sysinfo struct
    if unsafe { libc::sysinfo(&mut info) } != 0 {
        return None;
    }

    (info.freeram as u64).checked_mul(u64::from(info.mem_unit.max(1)))
}

#[cfg(not(target_os = "linux"))]
fn sysinfo_free_bytes() -> Option<u64> {
    // sysinfo is Linux-only
    None
}
