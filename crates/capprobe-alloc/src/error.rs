// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for capprobe-alloc.

use thiserror::Error;

/// Error type for `SealedVec` operations.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum SealedVecError {
    /// Attempted to reserve capacity on an already-sealed vector.
    #[error("Vector is already sealed and cannot be resized")]
    AlreadySealed,

    /// The allocator could not provide storage for the requested capacity.
    ///
    /// Covers both a refused allocation and a byte size that does not fit
    /// in `isize`. The vector is left unsealed and empty.
    #[error("Memory exhausted: cannot reserve {capacity} elements")]
    Exhausted {
        /// Number of elements that was requested.
        capacity: usize,
    },

    /// Attempted to push beyond the vector's sealed capacity.
    #[error("Capacity exceeded: cannot push beyond sealed capacity")]
    CapacityExceeded,
}

impl SealedVecError {
    /// Returns `true` for the allocator-failure variant.
    ///
    /// Callers probing memory limits recover from exhaustion and treat every
    /// other variant as a programming error.
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}
