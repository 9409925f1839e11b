// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Simulated probe targets.

use std::cell::Cell;
use std::num::NonZeroUsize;
use std::rc::Rc;

use capprobe_alloc::SealedVecError;
use capprobe_os::MemorySnapshot;

use crate::{AttemptError, ProbeTarget, RetryRecord, SessionObserver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailAt {
    Reserve,
    Populate,
}

/// Container that counts how many of its kind are alive.
#[derive(Debug)]
pub(crate) struct Tracked {
    pub(crate) capacity: usize,
    pub(crate) len: usize,
    live: Rc<Cell<usize>>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

/// Target where every capacity above `ceiling` runs out of memory.
#[derive(Debug)]
pub(crate) struct CeilingTarget {
    ceiling: usize,
    fail_at: FailAt,
    live: Rc<Cell<usize>>,
    pub(crate) attempts: Vec<usize>,
    pub(crate) max_live_at_reserve: usize,
    pub(crate) discarded: usize,
    pub(crate) reclaims: usize,
}

impl CeilingTarget {
    pub(crate) fn new(ceiling: usize, fail_at: FailAt) -> Self {
        Self {
            ceiling,
            fail_at,
            live: Rc::new(Cell::new(0)),
            attempts: Vec::new(),
            max_live_at_reserve: 0,
            discarded: 0,
            reclaims: 0,
        }
    }

    pub(crate) fn live(&self) -> usize {
        self.live.get()
    }
}

impl ProbeTarget for CeilingTarget {
    type Container = Tracked;

    fn reserve(&mut self, capacity: NonZeroUsize) -> Result<Tracked, AttemptError> {
        let capacity = capacity.get();
        self.attempts.push(capacity);
        self.max_live_at_reserve = self.max_live_at_reserve.max(self.live.get());

        if self.fail_at == FailAt::Reserve && capacity > self.ceiling {
            return Err(AttemptError::Exhausted { capacity });
        }

        self.live.set(self.live.get() + 1);
        Ok(Tracked {
            capacity,
            len: 0,
            live: Rc::clone(&self.live),
        })
    }

    fn populate(&mut self, container: &mut Tracked) -> Result<(), AttemptError> {
        if self.fail_at == FailAt::Populate && container.capacity > self.ceiling {
            // Run out half way through the fill
            container.len = container.capacity / 2;
            return Err(AttemptError::Exhausted {
                capacity: container.capacity,
            });
        }

        container.len = container.capacity;
        Ok(())
    }

    fn discard(&mut self, container: Tracked) {
        self.discarded += 1;
        drop(container);
    }

    fn reclaim(&mut self) {
        self.reclaims += 1;
    }
}

/// Target whose container is broken in a way unrelated to memory.
#[derive(Debug, Default)]
pub(crate) struct FaultyTarget {
    pub(crate) attempts: usize,
}

impl ProbeTarget for FaultyTarget {
    type Container = ();

    fn reserve(&mut self, _capacity: NonZeroUsize) -> Result<(), AttemptError> {
        self.attempts += 1;
        Err(AttemptError::Container(SealedVecError::AlreadySealed))
    }

    fn populate(&mut self, _container: &mut ()) -> Result<(), AttemptError> {
        Ok(())
    }
}

/// Target that succeeds at once and remembers the `RLIMIT_AS` it ran under.
#[derive(Debug, Default)]
pub(crate) struct LimitRecorder {
    pub(crate) limits: Vec<Option<u64>>,
}

impl ProbeTarget for LimitRecorder {
    type Container = usize;

    fn reserve(&mut self, capacity: NonZeroUsize) -> Result<usize, AttemptError> {
        self.limits.push(capprobe_os::address_space_limit());
        Ok(capacity.get())
    }

    fn populate(&mut self, _container: &mut usize) -> Result<(), AttemptError> {
        Ok(())
    }
}

/// Observer that keeps everything it is told.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) befores: Vec<Option<MemorySnapshot>>,
    pub(crate) retries: Vec<RetryRecord>,
}

impl SessionObserver for Recorder {
    fn before(&mut self, snapshot: Option<MemorySnapshot>) {
        self.befores.push(snapshot);
    }

    fn retry(&mut self, record: RetryRecord) {
        self.retries.push(record);
    }
}

pub(crate) fn record(attempted: usize, next: usize) -> RetryRecord {
    RetryRecord { attempted, next }
}
