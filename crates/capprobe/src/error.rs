// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for capprobe.

use capprobe_alloc::SealedVecError;
use capprobe_os::IdleError;
use thiserror::Error;

/// Failure of a single allocate-and-fill attempt.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum AttemptError {
    /// The allocator ran out of memory during reservation or population.
    ///
    /// Recoverable: the prober releases the container and halves.
    #[error("Memory exhausted at capacity {capacity}")]
    Exhausted {
        /// Capacity of the failed attempt.
        capacity: usize,
    },

    /// The container misbehaved for a reason other than exhaustion.
    #[error("Probe container fault: {0}")]
    Container(#[source] SealedVecError),
}

impl From<SealedVecError> for AttemptError {
    fn from(err: SealedVecError) -> Self {
        match err {
            SealedVecError::Exhausted { capacity } => Self::Exhausted { capacity },
            other => Self::Container(other),
        }
    }
}

/// Terminal failure of a probe.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ProbeError {
    /// Every candidate down to capacity 1 failed.
    #[error("No capacity could be allocated and populated (started at {initial})")]
    Exhausted {
        /// Initial capacity of the search.
        initial: usize,
    },

    /// A container fault that is not exhaustion aborted the search.
    #[error("Probe container fault: {0}")]
    Container(#[source] SealedVecError),
}

impl ProbeError {
    /// Process exit status: `2` for exhaustion, `3` for a container fault.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Exhausted { .. } => 2,
            Self::Container(_) => 3,
        }
    }
}

/// Error returned by a full [`crate::Session`] run.
#[derive(Debug, Error)]
pub enum Error {
    /// The pre-test idle period was interrupted.
    #[error(transparent)]
    Idle(#[from] IdleError),

    /// The probe itself failed.
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

impl Error {
    /// Process exit status for this error.
    ///
    /// `1` for an interrupted idle, otherwise [`ProbeError::exit_code`]. A
    /// session never returns [`ProbeError::Exhausted`] here (it becomes
    /// [`crate::Outcome::Exhausted`]), but callers of [`crate::probe`] that
    /// convert into this type get the same status.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Idle(_) => 1,
            Self::Probe(err) => err.exit_code(),
        }
    }
}
