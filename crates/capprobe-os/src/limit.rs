// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::error::LimitError;

/// Lowers the soft `RLIMIT_AS` of the current process to `bytes`.
///
/// With a ceiling in place, allocations beyond it fail inside the allocator
/// (`mmap` returns `ENOMEM`) and surface as recoverable errors, instead of
/// succeeding through overcommit and getting the process killed later.
///
/// The hard limit is left untouched; a request above it is clamped to it.
///
/// # Errors
///
/// - [`LimitError::Unsupported`] off Linux.
/// - [`LimitError::Rejected`] if `setrlimit(2)` fails.
#[cfg(target_os = "linux")]
pub fn limit_address_space(bytes: u64) -> Result<(), LimitError> {
    let current = get_rlimit_as().map_err(|source| LimitError::Rejected { bytes, source })?;

    let limit = libc::rlimit {
        rlim_cur: (bytes as libc::rlim_t).min(current.rlim_max),
        rlim_max: current.rlim_max,
    };

    // SAFETY: limit is a valid rlimit struct
    if unsafe { libc::setrlimit(libc::RLIMIT_AS, &limit) } != 0 {
        return Err(LimitError::Rejected {
            bytes,
            source: std::io::Error::last_os_error(),
        });
    }

    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn limit_address_space(_bytes: u64) -> Result<(), LimitError> {
    // RLIMIT_AS is only enforced on Linux
    Err(LimitError::Unsupported)
}

/// Returns the current soft `RLIMIT_AS`, or `None` when unlimited or unknown.
#[cfg(target_os = "linux")]
pub fn address_space_limit() -> Option<u64> {
    let current = get_rlimit_as().ok()?;

    if current.rlim_cur == libc::RLIM_INFINITY {
        return None;
    }

    Some(current.rlim_cur as u64)
}

#[cfg(not(target_os = "linux"))]
pub fn address_space_limit() -> Option<u64> {
    None
}

#[cfg(target_os = "linux")]
fn get_rlimit_as() -> std::io::Result<libc::rlimit> {
    let mut current = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };

    // SAFETY: current is a valid, writable rlimit struct
    if unsafe { libc::getrlimit(libc::RLIMIT_AS, &mut current) } != 0 {
        return Err(std::io::Error::last_os_error());
    }

    Ok(current)
}

/// Returns the virtual address space currently mapped by the process.
///
/// Reads the first field of `/proc/self/statm` (pages) and scales it by the
/// page size. `None` off Linux or if the file cannot be parsed.
#[cfg(target_os = "linux")]
pub fn address_space_usage() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let pages: u64 = statm.split_whitespace().next()?.parse().ok()?;

    // SAFETY: sysconf has no preconditions
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if page_size <= 0 {
        return None;
    }

    pages.checked_mul(page_size as u64)
}

#[cfg(not(target_os = "linux"))]
pub fn address_space_usage() -> Option<u64> {
    None
}

/// Lowered `RLIMIT_AS` that restores the previous soft limit on drop.
///
/// # Example
///
/// ```no_run
/// use capprobe_os::AddressSpaceCeiling;
///
/// let ceiling = AddressSpaceCeiling::lower_to(1 << 30).expect("Failed to lower_to(..)");
/// // allocations above 1 GiB of address space now fail inside the allocator
/// drop(ceiling);
/// ```
#[derive(Debug)]
pub struct AddressSpaceCeiling {
    bytes: u64,
    previous: Option<u64>,
}

impl AddressSpaceCeiling {
    /// Lowers the soft limit to `bytes`, unless the current one is already
    /// lower, in which case it is left alone.
    ///
    /// # Errors
    ///
    /// See [`limit_address_space`].
    pub fn lower_to(bytes: u64) -> Result<Self, LimitError> {
        let previous = address_space_limit();

        if previous.is_some_and(|current| current <= bytes) {
            return Ok(Self { bytes, previous });
        }

        limit_address_space(bytes)?;

        Ok(Self { bytes, previous })
    }

    /// Requested ceiling in bytes.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl Drop for AddressSpaceCeiling {
    fn drop(&mut self) {
        restore_soft_limit(self.previous);
    }
}

#[cfg(target_os = "linux")]
fn restore_soft_limit(previous: Option<u64>) {
    let Ok(current) = get_rlimit_as() else {
        return;
    };

    let limit = libc::rlimit {
        rlim_cur: previous
            .map_or(libc::RLIM_INFINITY, |bytes| bytes as libc::rlim_t)
            .min(current.rlim_max),
        rlim_max: current.rlim_max,
    };

    // SAFETY: limit is a valid rlimit struct; raising the soft limit up to
    // the hard limit needs no privilege
    unsafe { libc::setrlimit(libc::RLIMIT_AS, &limit) };
}

#[cfg(not(target_os = "linux"))]
fn restore_soft_limit(_previous: Option<u64>) {}
