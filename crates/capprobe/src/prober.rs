// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::fmt;
use core::num::NonZeroUsize;

use thousands::Separable;
use tracing::{debug, info, warn};

use crate::error::{AttemptError, ProbeError};
use crate::schedule::HalvingSchedule;
use crate::target::ProbeTarget;

/// Diagnostic emitted after each failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryRecord {
    /// Capacity that could not be allocated and filled.
    pub attempted: usize,
    /// Capacity of the next attempt (0 means the search is over).
    pub next: usize,
}

impl fmt::Display for RetryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Can't allocate {} objects with a list of the same size.",
            self.attempted.separate_with_commas()
        )?;
        write!(
            f,
            "Retrying allocation with capacity {}",
            self.next.separate_with_commas()
        )
    }
}

/// Successful probe: the achieved capacity and the populated container.
#[derive(Debug)]
pub struct Probed<C> {
    achieved: NonZeroUsize,
    container: C,
}

impl<C> Probed<C> {
    /// Capacity that was both allocated and fully populated.
    pub fn achieved(&self) -> NonZeroUsize {
        self.achieved
    }

    /// Borrows the populated container.
    pub fn container(&self) -> &C {
        &self.container
    }

    /// Takes ownership of the populated container.
    pub fn into_container(self) -> C {
        self.container
    }
}

/// Searches for the largest capacity that `target` can allocate and fill.
///
/// Equivalent to [`probe_with`] with an observer that ignores retries.
///
/// # Errors
///
/// See [`probe_with`].
///
/// # Example
///
/// ```
/// use capprobe::{HeapTarget, probe};
///
/// let probed = probe(&mut HeapTarget::new(false), 4096).expect("Failed to probe(..)");
/// assert_eq!(probed.achieved().get(), 4096);
/// assert_eq!(probed.container().len(), 4096);
/// ```
pub fn probe<T>(
    target: &mut T,
    initial_capacity: usize,
) -> Result<Probed<T::Container>, ProbeError>
where
    T: ProbeTarget,
{
    probe_with(target, initial_capacity, |_| {})
}

/// Searches for the largest capacity that `target` can allocate and fill,
/// halving after every exhausted attempt.
///
/// Candidates come from [`HalvingSchedule`]: `initial_capacity`, then half
/// of it, and so on down to 1. Each candidate is reserved and populated; on
/// exhaustion the container is discarded, `reclaim` is hinted and
/// `on_retry` receives the failed and next capacity before the next attempt.
/// At most one container is alive at any time.
///
/// # Errors
///
/// - [`ProbeError::Exhausted`] if every candidate failed, including the
///   degenerate `initial_capacity == 0` for which nothing is attempted.
/// - [`ProbeError::Container`] if the target reports a fault other than
///   exhaustion; the search stops immediately.
pub fn probe_with<T, F>(
    target: &mut T,
    initial_capacity: usize,
    mut on_retry: F,
) -> Result<Probed<T::Container>, ProbeError>
where
    T: ProbeTarget,
    F: FnMut(RetryRecord),
{
    for capacity in HalvingSchedule::new(initial_capacity) {
        debug!(capacity = capacity.get(), "probing capacity");

        match attempt(target, capacity) {
            Ok(container) => {
                info!(achieved = capacity.get(), "capacity allocated and populated");
                return Ok(Probed {
                    achieved: capacity,
                    container,
                });
            }
            Err(AttemptError::Exhausted { .. }) => {
                target.reclaim();

                let record = RetryRecord {
                    attempted: capacity.get(),
                    next: HalvingSchedule::halve(capacity.get()),
                };
                debug!(
                    attempted = record.attempted,
                    next = record.next,
                    "memory exhausted, halving"
                );
                on_retry(record);
            }
            Err(AttemptError::Container(err)) => {
                warn!(capacity = capacity.get(), %err, "probe container fault");
                return Err(ProbeError::Container(err));
            }
        }
    }

    warn!(initial_capacity, "no capacity could be allocated");
    Err(ProbeError::Exhausted {
        initial: initial_capacity,
    })
}

fn attempt<T>(target: &mut T, capacity: NonZeroUsize) -> Result<T::Container, AttemptError>
where
    T: ProbeTarget,
{
    let mut container = target.reserve(capacity)?;

    if let Err(err) = target.populate(&mut container) {
        target.discard(container);
        return Err(err);
    }

    Ok(container)
}
