// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::iter::FusedIterator;
use core::num::NonZeroUsize;

/// Candidate capacities of a halving backoff.
///
/// Yields `initial`, `initial / 2`, `initial / 4`, ... and stops before zero,
/// so `HalvingSchedule::new(0)` is empty and `HalvingSchedule::new(n)` yields
/// `floor(log2(n)) + 1` values.
///
/// # Example
///
/// ```
/// use capprobe::HalvingSchedule;
///
/// let capacities: Vec<usize> = HalvingSchedule::new(10).map(|c| c.get()).collect();
/// assert_eq!(capacities, [10, 5, 2, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct HalvingSchedule {
    next: Option<NonZeroUsize>,
}

impl HalvingSchedule {
    /// Creates a schedule starting at `initial`.
    pub fn new(initial: usize) -> Self {
        Self {
            next: NonZeroUsize::new(initial),
        }
    }

    /// Capacity that follows `capacity` after a failed attempt.
    #[inline]
    pub fn halve(capacity: usize) -> usize {
        capacity >> 1
    }
}

impl Iterator for HalvingSchedule {
    type Item = NonZeroUsize;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = NonZeroUsize::new(Self::halve(current.get()));

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map_or(0, |capacity| capacity.ilog2() as usize + 1);

        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HalvingSchedule {}

impl FusedIterator for HalvingSchedule {}
