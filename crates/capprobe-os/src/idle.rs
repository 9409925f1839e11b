// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::time::Duration;

use crate::error::IdleError;

/// Sleeps for `duration`.
///
/// On Unix the sleep is a single `nanosleep(2)`, so a signal delivered to
/// the calling thread (with a handler installed) cuts it short and is
/// reported as [`IdleError::Interrupted`] rather than silently resumed.
/// Elsewhere this is `std::thread::sleep`, which cannot be interrupted.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// capprobe_os::idle(Duration::from_millis(1)).expect("Failed to idle(..)");
/// ```
#[cfg(unix)]
pub fn idle(duration: Duration) -> Result<(), IdleError> {
    // SAFETY: timespec is plain-old-data; all-zero is a valid bit pattern
    let mut request: libc::timespec = unsafe { core::mem::zeroed() };
    request.tv_sec = duration.as_secs().min(libc::time_t::MAX as u64) as libc::time_t;
    request.tv_nsec = duration.subsec_nanos() as libc::c_long;

    // SAFETY: request is valid; a null remainder pointer is allowed
    if unsafe { libc::nanosleep(&request, core::ptr::null_mut()) } == 0 {
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::EINTR) {
        return Err(IdleError::Interrupted);
    }

    Err(IdleError::Os(err))
}

#[cfg(not(unix))]
pub fn idle(duration: Duration) -> Result<(), IdleError> {
    std::thread::sleep(duration);
    Ok(())
}
