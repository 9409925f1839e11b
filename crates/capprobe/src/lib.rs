// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! How large can a fully populated collection grow before the heap runs out?
//!
//! `capprobe` answers empirically: it reserves a container for a candidate
//! capacity, fills every slot with a placeholder, and on exhaustion releases
//! everything, halves the candidate and tries again.
//!
//! The answer only holds for the run that produced it: concurrent processes
//! and allocator fragmentation move the real ceiling between runs, so it is
//! not a capacity plan.
//!
//! # Quick Start
//!
//! ```rust
//! use capprobe::{HeapTarget, ProbeError, probe_with};
//!
//! fn main() -> Result<(), ProbeError> {
//!     let mut target = HeapTarget::new(false);
//!
//!     let probed = probe_with(&mut target, 1 << 16, |record| {
//!         println!("{record}");
//!     })?;
//!
//!     assert_eq!(probed.container().len(), probed.achieved().get());
//!     Ok(())
//! }
//! ```
//!
//! # Out of memory as a value
//!
//! Storage is requested through `Vec::try_reserve_exact` (wrapped by
//! [`capprobe_alloc::SealedVec`]), so exhaustion arrives as an
//! [`AttemptError::Exhausted`] the search loop can react to. Filling never
//! grows the container past its reservation.
//!
//! On Linux with memory overcommit, a reservation can succeed and the
//! process can still be killed while the pages are touched. A [`Session`]
//! therefore lowers the address-space limit to what is mapped plus what is
//! free for the duration of the search, which keeps every failure inside the
//! allocator where it is recoverable. Bare [`probe`] callers can do the same
//! with [`capprobe_os::AddressSpaceCeiling`].
//!
//! ## License
//!
//! GPL-3.0-only

#![warn(missing_docs)]

mod config;
mod error;
mod prober;
mod report;
mod schedule;
mod session;
mod target;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_IDLE, ProbeConfig};
pub use error::{AttemptError, Error, ProbeError};
pub use prober::{Probed, RetryRecord, probe, probe_with};
pub use report::{FreeHeapLine, Outcome, Report, exit_code};
pub use schedule::HalvingSchedule;
pub use session::{Session, SessionObserver};
pub use target::{HeapTarget, Placeholder, ProbeTarget};
