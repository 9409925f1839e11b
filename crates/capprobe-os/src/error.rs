// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for capprobe-os.

use thiserror::Error;

/// Error returned by [`crate::idle`].
#[derive(Debug, Error)]
pub enum IdleError {
    /// A signal interrupted the sleep before it completed.
    #[error("Idle period interrupted by a signal")]
    Interrupted,

    /// The sleep syscall failed for a reason other than a signal.
    #[error("Idle period failed: {0}")]
    Os(#[source] std::io::Error),
}

/// Error returned by [`crate::limit_address_space`].
#[derive(Debug, Error)]
pub enum LimitError {
    /// The platform has no address-space limit.
    #[error("Address-space limits are not supported on this platform")]
    Unsupported,

    /// `setrlimit(2)` refused the new limit.
    #[error("setrlimit(RLIMIT_AS, {bytes}) failed: {source}")]
    Rejected {
        /// Requested limit in bytes.
        bytes: u64,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
}
