// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::num::NonZeroUsize;

use capprobe_alloc::SealedVec;
#[cfg(test)]
use capprobe_alloc::SealedVecBehaviour;
use tracing::trace;

use crate::error::AttemptError;

/// Opaque element stored by the heap probe.
///
/// Eight bytes wide so a populated container occupies real memory; it only
/// records the slot it was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(u64);

impl Placeholder {
    /// Creates the placeholder for slot `index`.
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index as u64)
    }

    /// Slot this placeholder was written to.
    pub fn index(&self) -> u64 {
        self.0
    }
}

/// Something the prober can try to allocate and fill at a given capacity.
///
/// The prober drives one attempt at a time: `reserve`, then `populate`, then
/// either keeps the container or hands it back through `discard` and calls
/// `reclaim` before the next attempt.
pub trait ProbeTarget {
    /// Container produced by a successful attempt.
    type Container;

    /// Reserves storage for exactly `capacity` elements.
    ///
    /// # Errors
    ///
    /// [`AttemptError::Exhausted`] if the storage cannot be obtained.
    fn reserve(&mut self, capacity: NonZeroUsize) -> Result<Self::Container, AttemptError>;

    /// Fills every reserved slot of `container` without growing it.
    ///
    /// # Errors
    ///
    /// [`AttemptError::Exhausted`] if memory runs out while filling.
    fn populate(&mut self, container: &mut Self::Container) -> Result<(), AttemptError>;

    /// Releases a container from a failed attempt.
    fn discard(&mut self, container: Self::Container) {
        drop(container);
    }

    /// Advisory hint to reclaim freed memory before the next attempt.
    fn reclaim(&mut self) {}
}

/// Probes the process heap with `SealedVec<Placeholder>` containers.
#[derive(Debug, Clone, Default)]
pub struct HeapTarget {
    reclaim_hints: bool,
    #[cfg(test)]
    behaviour: SealedVecBehaviour,
}

impl HeapTarget {
    /// Creates a heap target; `reclaim_hints` enables `malloc_trim` between
    /// attempts.
    pub fn new(reclaim_hints: bool) -> Self {
        Self {
            reclaim_hints,
            #[cfg(test)]
            behaviour: SealedVecBehaviour::None,
        }
    }

    #[cfg(test)]
    pub(crate) fn change_behaviour(&mut self, behaviour: SealedVecBehaviour) {
        self.behaviour = behaviour;
    }
}

impl ProbeTarget for HeapTarget {
    type Container = SealedVec<Placeholder>;

    fn reserve(&mut self, capacity: NonZeroUsize) -> Result<Self::Container, AttemptError> {
        let mut vec = SealedVec::new();

        #[cfg(test)]
        vec.change_behaviour(self.behaviour);

        vec.try_reserve_exact(capacity.get())?;

        Ok(vec)
    }

    fn populate(&mut self, container: &mut Self::Container) -> Result<(), AttemptError> {
        container.fill_with(Placeholder::new)?;

        Ok(())
    }

    fn discard(&mut self, container: Self::Container) {
        trace!(len = container.len(), "releasing probe container");
        container.release();
    }

    fn reclaim(&mut self) {
        if self.reclaim_hints {
            let trimmed = capprobe_os::trim_heap();
            trace!(trimmed, "heap trim hint");
        }
    }
}
