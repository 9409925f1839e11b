// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::fmt;

use capprobe_os::MemorySnapshot;
use thousands::Separable;

use crate::error::{Error, ProbeError};
use crate::prober::Probed;

/// Renders `<label> Free Heap Space:  <n> MiB`.
#[derive(Debug, Clone, Copy)]
pub struct FreeHeapLine<'a> {
    label: &'a str,
    snapshot: Option<MemorySnapshot>,
}

impl<'a> FreeHeapLine<'a> {
    /// Line for the snapshot taken before probing.
    pub fn before(snapshot: Option<MemorySnapshot>) -> Self {
        Self {
            label: "[BEFORE]",
            snapshot,
        }
    }

    /// Line for the snapshot taken after probing.
    pub fn after(snapshot: Option<MemorySnapshot>) -> Self {
        Self {
            label: "[AFTER] ",
            snapshot,
        }
    }
}

impl fmt::Display for FreeHeapLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.snapshot {
            Some(snapshot) => write!(
                f,
                "{} Free Heap Space:  {} MiB",
                self.label,
                snapshot.mebibytes()
            ),
            None => write!(f, "{} Free Heap Space:  unavailable", self.label),
        }
    }
}

/// How the search ended.
#[derive(Debug)]
pub enum Outcome<C> {
    /// A capacity was allocated and fully populated.
    Achieved(Probed<C>),
    /// Every candidate failed.
    Exhausted {
        /// Initial capacity of the search.
        initial: usize,
    },
}

/// Result of a complete [`crate::Session`] run.
#[derive(Debug)]
pub struct Report<C> {
    pub(crate) before: Option<MemorySnapshot>,
    pub(crate) after: Option<MemorySnapshot>,
    pub(crate) outcome: Outcome<C>,
}

impl<C> Report<C> {
    /// Free memory before probing.
    pub fn before(&self) -> Option<MemorySnapshot> {
        self.before
    }

    /// Free memory after probing, with the achieved container still alive.
    pub fn after(&self) -> Option<MemorySnapshot> {
        self.after
    }

    /// How the search ended.
    pub fn outcome(&self) -> &Outcome<C> {
        &self.outcome
    }

    /// Consumes the report and returns the outcome.
    pub fn into_outcome(self) -> Outcome<C> {
        self.outcome
    }

    /// Process exit status: `0` when a capacity was achieved, otherwise the
    /// status of [`ProbeError::Exhausted`].
    pub fn exit_code(&self) -> u8 {
        match self.outcome {
            Outcome::Achieved(_) => 0,
            Outcome::Exhausted { initial } => ProbeError::Exhausted { initial }.exit_code(),
        }
    }
}

/// Process exit status of a session run.
///
/// | status | meaning |
/// |---|---|
/// | `0` | a capacity was achieved |
/// | `1` | the idle period was interrupted |
/// | `2` | every capacity down to 1 failed |
/// | `3` | container fault |
pub fn exit_code<C>(result: &Result<Report<C>, Error>) -> u8 {
    match result {
        Ok(report) => report.exit_code(),
        Err(err) => err.exit_code(),
    }
}

impl<C> fmt::Display for Report<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", FreeHeapLine::before(self.before))?;
        writeln!(f, "{}", FreeHeapLine::after(self.after))?;
        writeln!(f)?;

        match &self.outcome {
            Outcome::Achieved(probed) => write!(
                f,
                "Allocated and fully populated list with {} objects",
                probed.achieved().get().separate_with_commas()
            ),
            Outcome::Exhausted { initial } => write!(
                f,
                "Could not allocate and populate a list of any size (started at {})",
                initial.separate_with_commas()
            ),
        }
    }
}
