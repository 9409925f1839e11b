// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use alloc::vec::Vec;

use crate::error::SealedVecError;

/// Test behaviour for injecting failures in `SealedVec` operations.
///
/// This is only available with the `test_utils` feature and allows users
/// to exercise exhaustion handling without actually running out of memory.
///
/// The behaviour is sticky - once set, it remains active until changed.
///
/// # Example
///
/// ```rust
/// // test_utils feature required in dev-dependencies
/// #[cfg(test)]
/// mod tests {
///     use capprobe_alloc::{SealedVec, SealedVecBehaviour, SealedVecError};
///
///     #[test]
///     fn test_handles_exhaustion_while_filling() -> Result<(), SealedVecError> {
///         let mut vec = SealedVec::try_with_capacity(10)?;
///
///         // Inject failure
///         vec.change_behaviour(SealedVecBehaviour::FailAtPush);
///
///         // This will fail even though capacity allows it
///         assert!(vec.push(1u8).unwrap_err().is_exhaustion());
///
///         // Reset to normal behaviour
///         vec.change_behaviour(SealedVecBehaviour::None);
///
///         // Now it works
///         vec.push(1u8)?;
///         Ok(())
///     }
/// }
/// ```
#[cfg(any(test, feature = "test_utils"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SealedVecBehaviour {
    /// Normal behaviour - no injected failures.
    #[default]
    None,
    /// Next `try_reserve_exact()` call will fail with `Exhausted`.
    FailAtReserve,
    /// Next `push()` call will fail with `Exhausted`.
    FailAtPush,
}

/// Vec with a single fallible reservation that never grows afterwards.
///
/// Storage is requested exactly once through `try_reserve_exact()`, which
/// reports allocator failure as [`SealedVecError::Exhausted`] instead of
/// aborting the process. After that the vector is sealed: `push()` fails
/// with [`SealedVecError::CapacityExceeded`] rather than reallocating, so
/// filling a sealed vector never asks the allocator for more memory.
///
/// # Example
///
/// ```rust
/// use capprobe_alloc::{SealedVec, SealedVecError};
///
/// fn example() -> Result<(), SealedVecError> {
///     let mut vec = SealedVec::new();
///     vec.try_reserve_exact(5)?;
///
///     vec.push(1u8)?;
///     vec.push(2u8)?;
///
///     assert_eq!(vec.len(), 2);
///     assert_eq!(vec.capacity(), 5);
///     Ok(())
/// }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct SealedVec<T> {
    inner: Vec<T>,
    sealed_capacity: usize,
    has_been_sealed: bool,
    #[cfg(any(test, feature = "test_utils"))]
    behaviour: SealedVecBehaviour,
}

impl<T> SealedVec<T> {
    /// Creates a new empty `SealedVec` with zero capacity.
    ///
    /// The vector is not sealed until `try_reserve_exact()` succeeds.
    ///
    /// # Example
    ///
    /// ```rust
    /// use capprobe_alloc::SealedVec;
    ///
    /// let vec: SealedVec<u8> = SealedVec::new();
    /// assert_eq!(vec.len(), 0);
    /// assert_eq!(vec.capacity(), 0);
    /// assert!(!vec.is_sealed());
    /// ```
    pub fn new() -> Self {
        Self {
            inner: Vec::new(),
            sealed_capacity: 0,
            has_been_sealed: false,
            #[cfg(any(test, feature = "test_utils"))]
            behaviour: SealedVecBehaviour::default(),
        }
    }

    /// Creates a `SealedVec` and seals it with exactly `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns [`SealedVecError::Exhausted`] if the allocator refuses the
    /// reservation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use capprobe_alloc::{SealedVec, SealedVecError};
    ///
    /// fn example() -> Result<(), SealedVecError> {
    ///     let mut vec = SealedVec::<u8>::try_with_capacity(10)?;
    ///     assert_eq!(vec.capacity(), 10);
    ///     // Already sealed - cannot reserve again
    ///     assert!(vec.try_reserve_exact(20).is_err());
    ///     Ok(())
    /// }
    /// # example().unwrap();
    /// ```
    pub fn try_with_capacity(capacity: usize) -> Result<Self, SealedVecError> {
        let mut vec = Self::new();
        vec.try_reserve_exact(capacity)?;

        Ok(vec)
    }

    /// Reserves exact capacity and seals the vector.
    ///
    /// # Errors
    ///
    /// - [`SealedVecError::AlreadySealed`] if the vector is already sealed.
    /// - [`SealedVecError::Exhausted`] if the allocator refuses the request
    ///   or the byte size overflows. The vector stays unsealed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use capprobe_alloc::{SealedVec, SealedVecError};
    ///
    /// let mut vec: SealedVec<u64> = SealedVec::new();
    ///
    /// // isize::MAX elements of eight bytes can never be laid out
    /// assert!(matches!(
    ///     vec.try_reserve_exact(isize::MAX as usize),
    ///     Err(SealedVecError::Exhausted { .. })
    /// ));
    /// assert!(!vec.is_sealed());
    /// ```
    pub fn try_reserve_exact(&mut self, capacity: usize) -> Result<(), SealedVecError> {
        if self.has_been_sealed {
            return Err(SealedVecError::AlreadySealed);
        }

        #[cfg(any(test, feature = "test_utils"))]
        if matches!(self.behaviour, SealedVecBehaviour::FailAtReserve) {
            return Err(SealedVecError::Exhausted { capacity });
        }

        self.inner
            .try_reserve_exact(capacity)
            .map_err(|_| SealedVecError::Exhausted { capacity })?;

        self.sealed_capacity = capacity;
        self.has_been_sealed = true;

        Ok(())
    }

    /// Pushes a value onto the end of the vector.
    ///
    /// Never reallocates: the backing storage was reserved by
    /// `try_reserve_exact()` and a push past it is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`SealedVecError::CapacityExceeded`] if the vector is full
    /// (an unsealed vector has capacity 0).
    ///
    /// # Example
    ///
    /// ```rust
    /// use capprobe_alloc::{SealedVec, SealedVecError};
    ///
    /// fn example() -> Result<(), SealedVecError> {
    ///     let mut vec = SealedVec::try_with_capacity(2)?;
    ///     vec.push(1u8)?;
    ///     vec.push(2u8)?;
    ///
    ///     // Exceeds capacity
    ///     assert_eq!(vec.push(3u8), Err(SealedVecError::CapacityExceeded));
    ///     Ok(())
    /// }
    /// # example().unwrap();
    /// ```
    pub fn push(&mut self, value: T) -> Result<(), SealedVecError> {
        #[cfg(any(test, feature = "test_utils"))]
        if matches!(self.behaviour, SealedVecBehaviour::FailAtPush) {
            return Err(SealedVecError::Exhausted {
                capacity: self.sealed_capacity,
            });
        }

        if self.is_full() {
            return Err(SealedVecError::CapacityExceeded);
        }

        self.inner.push(value);
        Ok(())
    }

    /// Pushes `f(index)` for every remaining slot until the vector is full.
    ///
    /// Elements are appended one at a time; a failed push stops the fill and
    /// leaves the elements written so far in place.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `push()`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use capprobe_alloc::{SealedVec, SealedVecError};
    ///
    /// fn example() -> Result<(), SealedVecError> {
    ///     let mut vec = SealedVec::try_with_capacity(4)?;
    ///     vec.fill_with(|index| index * 10)?;
    ///
    ///     assert_eq!(vec.as_slice(), &[0, 10, 20, 30]);
    ///     assert!(vec.is_full());
    ///     Ok(())
    /// }
    /// # example().unwrap();
    /// ```
    pub fn fill_with<F>(&mut self, mut f: F) -> Result<(), SealedVecError>
    where
        F: FnMut(usize) -> T,
    {
        while !self.is_full() {
            let index = self.len();
            self.push(f(index))?;
        }

        Ok(())
    }

    /// Clears the contents and returns the allocation to the allocator.
    ///
    /// # Example
    ///
    /// ```rust
    /// use capprobe_alloc::{SealedVec, SealedVecError};
    ///
    /// fn example() -> Result<(), SealedVecError> {
    ///     let mut vec = SealedVec::try_with_capacity(3)?;
    ///     vec.fill_with(|index| index as u8)?;
    ///     vec.release();
    ///     Ok(())
    /// }
    /// # example().unwrap();
    /// ```
    pub fn release(mut self) {
        self.inner.clear();
        self.inner.shrink_to_fit();
    }

    /// Returns the number of elements in the vector.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns the sealed capacity of the vector (0 until sealed).
    pub fn capacity(&self) -> usize {
        self.sealed_capacity
    }

    /// Returns `true` if the vector contains no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` once every reserved slot holds an element.
    pub fn is_full(&self) -> bool {
        self.len() >= self.sealed_capacity
    }

    /// Returns `true` once `try_reserve_exact()` has succeeded.
    pub fn is_sealed(&self) -> bool {
        self.has_been_sealed
    }

    /// Returns an immutable slice view of the vector.
    pub fn as_slice(&self) -> &[T] {
        &self.inner
    }

    /// Consumes the vector and returns the inner `Vec`.
    pub fn into_vec(self) -> Vec<T> {
        self.inner
    }

    /// Changes the test behaviour for injecting failures.
    ///
    /// Only available with the `test_utils` feature.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn change_behaviour(&mut self, behaviour: SealedVecBehaviour) {
        self.behaviour = behaviour;
    }
}

impl<T> Default for SealedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}
