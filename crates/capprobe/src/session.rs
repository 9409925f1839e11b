// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::num::NonZeroUsize;

use capprobe_os::{AddressSpaceCeiling, MemorySnapshot};
use tracing::{debug, info, warn};

use crate::config::ProbeConfig;
use crate::error::{AttemptError, Error, ProbeError};
use crate::prober::{RetryRecord, probe_with};
use crate::report::{Outcome, Report};
use crate::target::{HeapTarget, ProbeTarget};

/// Receives progress from a [`Session`] as it happens.
///
/// Both hooks default to doing nothing. Observers only report; they have no
/// way to influence the search.
pub trait SessionObserver {
    /// Called with the first snapshot, before the idle period.
    fn before(&mut self, _snapshot: Option<MemorySnapshot>) {}

    /// Called after each failed attempt.
    fn retry(&mut self, _record: RetryRecord) {}
}

impl SessionObserver for () {}

/// One complete demonstration: snapshot, idle, probe, snapshot.
#[derive(Debug)]
pub struct Session<T = HeapTarget> {
    config: ProbeConfig,
    target: T,
}

impl Session<HeapTarget> {
    /// Creates a session that probes the process heap.
    pub fn new(config: ProbeConfig) -> Self {
        let target = HeapTarget::new(config.reclaim_hints());
        Self { config, target }
    }
}

impl<T> Session<T>
where
    T: ProbeTarget,
{
    /// Creates a session that probes a custom target.
    pub fn with_target(config: ProbeConfig, target: T) -> Self {
        Self { config, target }
    }

    /// Session settings.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Target being probed.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Runs the demonstration.
    ///
    /// Unless disabled in the config, `RLIMIT_AS` is lowered to the mapped
    /// address space plus free memory while searching, and restored
    /// afterwards. With reclaim hints disabled, the target's `reclaim` is
    /// never called, not even between attempts.
    ///
    /// Exhaustion is not an error here: it is reported as
    /// [`Outcome::Exhausted`] together with both snapshots.
    ///
    /// # Errors
    ///
    /// - [`Error::Idle`] if the idle period was interrupted; nothing has been
    ///   allocated at that point.
    /// - [`Error::Probe`] for container faults other than exhaustion.
    pub fn run<O>(&mut self, observer: &mut O) -> Result<Report<T::Container>, Error>
    where
        O: SessionObserver,
    {
        self.reclaim_hint();
        let before = capprobe_os::free_memory();
        info!(
            free_mib = before.map(|s| s.mebibytes()),
            "free memory before probing"
        );
        observer.before(before);

        if !self.config.idle().is_zero() {
            debug!(idle_ms = self.config.idle().as_millis() as u64, "idling");
            capprobe_os::idle(self.config.idle())?;
        }

        let ceiling = self.bound_address_space();
        let initial = self.config.initial_capacity();
        let on_retry = |record: RetryRecord| observer.retry(record);

        let result = if self.config.reclaim_hints() {
            probe_with(&mut self.target, initial, on_retry)
        } else {
            probe_with(&mut WithoutReclaim(&mut self.target), initial, on_retry)
        };
        drop(ceiling);

        let outcome = match result {
            Ok(probed) => Outcome::Achieved(probed),
            Err(ProbeError::Exhausted { initial }) => Outcome::Exhausted { initial },
            Err(err) => return Err(err.into()),
        };

        self.reclaim_hint();
        let after = capprobe_os::free_memory();
        info!(
            free_mib = after.map(|s| s.mebibytes()),
            "free memory after probing"
        );

        Ok(Report {
            before,
            after,
            outcome,
        })
    }

    fn reclaim_hint(&mut self) {
        if self.config.reclaim_hints() {
            self.target.reclaim();
        }
    }

    /// Caps the address space so overcommitted reservations fail instead of
    /// being killed while populated.
    fn bound_address_space(&self) -> Option<AddressSpaceCeiling> {
        if !self.config.bound_to_free_memory() {
            return None;
        }

        let (Some(mapped), Some(free)) = (
            capprobe_os::address_space_usage(),
            capprobe_os::free_memory(),
        ) else {
            debug!("address space left unbounded: usage or free memory unavailable");
            return None;
        };

        let bytes = mapped.saturating_add(free.free_bytes());

        match AddressSpaceCeiling::lower_to(bytes) {
            Ok(ceiling) => {
                debug!(
                    mapped,
                    free = free.free_bytes(),
                    limit = capprobe_os::address_space_limit(),
                    "address space bounded"
                );
                Some(ceiling)
            }
            Err(err) => {
                warn!(%err, bytes, "address space left unbounded");
                None
            }
        }
    }
}

/// Forwards to a target with its reclaim hint suppressed.
struct WithoutReclaim<'a, T>(&'a mut T);

impl<T> ProbeTarget for WithoutReclaim<'_, T>
where
    T: ProbeTarget,
{
    type Container = T::Container;

    fn reserve(&mut self, capacity: NonZeroUsize) -> Result<Self::Container, AttemptError> {
        self.0.reserve(capacity)
    }

    fn populate(&mut self, container: &mut Self::Container) -> Result<(), AttemptError> {
        self.0.populate(container)
    }

    fn discard(&mut self, container: Self::Container) {
        self.0.discard(container);
    }

    fn reclaim(&mut self) {}
}
