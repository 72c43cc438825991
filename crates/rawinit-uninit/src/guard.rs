//! Rollback guard for element-by-element construction.
//!
//! [`RollbackGuard`] is armed over a destination range before the first
//! element is constructed. Each [`push`](RollbackGuard::push) begins one
//! element's lifetime; [`commit`](RollbackGuard::commit) disarms the guard
//! and hands back the initialized prefix. If the guard is dropped while
//! still armed (an early `return` on error, or a panic unwinding through
//! the construction loop), every element it constructed is destroyed.

use std::marker::PhantomData;
use std::mem::{ManuallyDrop, MaybeUninit};
use std::slice;

use rawinit_core::InitError;
use tracing::debug;

use crate::raw::{construct_at, destroy_range};

/// Destroys a partially constructed prefix unless committed.
pub struct RollbackGuard<'a, T> {
    start: *mut T,
    capacity: usize,
    initialized: usize,
    _slots: PhantomData<&'a mut [MaybeUninit<T>]>,
}

impl<'a, T> RollbackGuard<'a, T> {
    /// Arm a guard over `slots`. None of the slots may hold a live value.
    pub fn new(slots: &'a mut [MaybeUninit<T>]) -> Self {
        Self {
            start: slots.as_mut_ptr().cast::<T>(),
            capacity: slots.len(),
            initialized: 0,
            _slots: PhantomData,
        }
    }

    /// Number of elements constructed so far.
    pub fn initialized(&self) -> usize {
        self.initialized
    }

    /// Number of slots still free.
    pub fn remaining(&self) -> usize {
        self.capacity - self.initialized
    }

    /// Construct `value` in the next free slot.
    ///
    /// # Panics
    ///
    /// Panics if every slot is already initialized. The elements
    /// constructed so far are destroyed during unwinding.
    pub fn push(&mut self, value: T) {
        assert!(
            self.initialized < self.capacity,
            "rollback guard full: {} slots",
            self.capacity
        );
        // SAFETY: `initialized < capacity`, so the slot lies inside the
        // borrowed range and holds no live value.
        unsafe { construct_at(self.start.add(self.initialized), value) };
        self.initialized += 1;
    }

    /// Disarm the guard and return the initialized prefix.
    pub fn commit(self) -> &'a mut [T] {
        let this = ManuallyDrop::new(self);
        // SAFETY: the first `initialized` slots were written by `push` and
        // the guard holds the unique borrow of them for `'a`.
        unsafe { slice::from_raw_parts_mut(this.start, this.initialized) }
    }
}

impl<T> Drop for RollbackGuard<'_, T> {
    fn drop(&mut self) {
        if self.initialized == 0 {
            return;
        }
        debug!(
            constructed = self.initialized,
            capacity = self.capacity,
            "rolling back partially constructed range"
        );
        // SAFETY: exactly the first `initialized` slots are live.
        unsafe { destroy_range(self.start, self.initialized) };
    }
}

/// Construct `count` elements into `destination` with `make(index)`.
///
/// All-or-nothing: on `Err` or panic every element already constructed is
/// destroyed before control leaves this function.
pub(crate) fn construct_each<T, E, F>(
    destination: &mut [MaybeUninit<T>],
    count: usize,
    mut make: F,
) -> Result<&mut [T], InitError<E>>
where
    F: FnMut(usize) -> Result<T, InitError<E>>,
{
    check_fits(count, destination.len())?;
    let mut guard = RollbackGuard::new(&mut destination[..count]);
    for index in 0..count {
        let value = make(index)?;
        guard.push(value);
    }
    Ok(guard.commit())
}

pub(crate) fn check_fits<E>(required: usize, available: usize) -> Result<(), InitError<E>> {
    if required > available {
        return Err(InitError::DestinationTooShort {
            required,
            available,
        });
    }
    Ok(())
}

/// Panic with the standard message if `required` slots do not fit.
#[track_caller]
pub(crate) fn assert_fits(required: usize, available: usize) {
    if let Err(err) = check_fits::<std::convert::Infallible>(required, available) {
        panic!("{err}");
    }
}

/// Unwrap the result of an operation whose constructors cannot fail and
/// whose destination was already checked with [`assert_fits`].
#[track_caller]
pub(crate) fn unwrap_infallible<T>(result: Result<T, InitError>) -> T {
    match result {
        Ok(value) => value,
        Err(InitError::Construct { source, .. }) => match source {},
        Err(err) => panic!("{err}"),
    }
}
