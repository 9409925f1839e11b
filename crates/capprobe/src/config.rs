// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::time::Duration;

/// Default pause before probing, long enough to read the first snapshot.
pub const DEFAULT_IDLE: Duration = Duration::from_secs(2);

/// Settings for a [`crate::Session`].
///
/// The defaults reproduce the command-line demonstration: start from
/// `isize::MAX` elements, idle for two seconds, hint the allocator to trim
/// between attempts, and cap the address space at what is mapped plus what
/// is free so that overcommitted reservations fail in the allocator.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use capprobe::ProbeConfig;
///
/// let config = ProbeConfig::default()
///     .with_initial_capacity(1 << 20)
///     .with_idle(Duration::ZERO);
///
/// assert_eq!(config.initial_capacity(), 1 << 20);
/// assert!(config.reclaim_hints());
/// assert!(config.bound_to_free_memory());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    initial_capacity: usize,
    idle: Duration,
    reclaim_hints: bool,
    bound_to_free_memory: bool,
}

impl ProbeConfig {
    /// Sets the first candidate capacity.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the pause between the first snapshot and the probe.
    pub fn with_idle(mut self, idle: Duration) -> Self {
        self.idle = idle;
        self
    }

    /// Enables or disables heap trim hints.
    pub fn with_reclaim_hints(mut self, reclaim_hints: bool) -> Self {
        self.reclaim_hints = reclaim_hints;
        self
    }

    /// Enables or disables lowering `RLIMIT_AS` to the current mapping plus
    /// free memory for the duration of the search.
    pub fn with_bound_to_free_memory(mut self, bound_to_free_memory: bool) -> Self {
        self.bound_to_free_memory = bound_to_free_memory;
        self
    }

    /// First candidate capacity.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Pause before probing.
    pub fn idle(&self) -> Duration {
        self.idle
    }

    /// Whether heap trim hints are issued.
    pub fn reclaim_hints(&self) -> bool {
        self.reclaim_hints
    }

    /// Whether the address space is capped while searching.
    pub fn bound_to_free_memory(&self) -> bool {
        self.bound_to_free_memory
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            initial_capacity: isize::MAX as usize,
            idle: DEFAULT_IDLE,
            reclaim_hints: true,
            bound_to_free_memory: true,
        }
    }
}
