// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Vec with a single fallible reservation that never grows after sealing.
//!
//! `SealedVec<T>` is a wrapper around `Vec<T>` built for probing how much
//! memory the allocator will hand out: the one and only reservation goes
//! through `Vec::try_reserve_exact`, and pushes are bounded by that
//! reservation instead of triggering the usual doubling growth.
//!
//! # Core Guarantees
//!
//! - **Recoverable exhaustion**: a refused reservation is reported as
//!   [`SealedVecError::Exhausted`] instead of aborting the process.
//! - **Controlled capacity**: once sealed with `try_reserve_exact()`, that
//!   method cannot be called again.
//! - **No hidden growth**: `push()` and `fill_with()` fail instead of
//!   reallocating, so filling never requests more memory than was reserved.
//!
//! # Example: Basic Usage
//!
//! ```rust
//! use capprobe_alloc::{SealedVec, SealedVecError};
//!
//! fn example() -> Result<(), SealedVecError> {
//!     let mut vec = SealedVec::<u8>::new();
//!     vec.try_reserve_exact(10)?;
//!
//!     // Now sealed - cannot reserve again
//!     assert!(vec.try_reserve_exact(20).is_err());
//!
//!     // Fill every reserved slot
//!     vec.fill_with(|index| index as u8)?;
//!
//!     // Exceeding capacity fails
//!     assert!(vec.push(42).is_err());
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! # Test Utilities
//!
//! Enable the `test_utils` feature to inject failures for testing error handling paths:
//!
//! ```toml
//! [dev-dependencies]
//! capprobe-alloc = { version = "*", features = ["test_utils"] }
//! ```
//!
//! Then use `SealedVecBehaviour` to simulate exhaustion during reservation
//! or population.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod error;
mod sealed_vec;

#[cfg(test)]
mod tests;

pub use error::SealedVecError;
pub use sealed_vec::SealedVec;

#[cfg(any(test, feature = "test_utils"))]
pub use sealed_vec::SealedVecBehaviour;
