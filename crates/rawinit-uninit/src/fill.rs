//! Fill uninitialized storage with copies of a value.

use std::mem::MaybeUninit;
use std::ptr;

use rawinit_core::{InitError, Lifecycle};

use crate::guard::{assert_fits, construct_each, unwrap_infallible};
use crate::raw::assume_init_prefix;

/// Fill every slot of `destination` with a copy of `value`.
///
/// Equivalent to [`fill_n_uninitialized`] with `count = destination.len()`.
pub fn fill_uninitialized<'a, T>(destination: &'a mut [MaybeUninit<T>], value: &T) -> &'a mut [T]
where
    T: Clone + Lifecycle,
{
    let count = destination.len();
    fill_n_uninitialized(destination, count, value)
}

/// Construct `count` copies of `value` at the front of `destination`.
///
/// Returns the initialized prefix. Trivial types are block-filled;
/// otherwise each copy is cloned in turn and a panicking `Clone` destroys
/// the copies made so far. `count == 0` constructs nothing.
///
/// # Panics
///
/// Panics if `count > destination.len()`, before any element is
/// constructed.
pub fn fill_n_uninitialized<'a, T>(
    destination: &'a mut [MaybeUninit<T>],
    count: usize,
    value: &T,
) -> &'a mut [T]
where
    T: Clone + Lifecycle,
{
    assert_fits(count, destination.len());
    if T::TRIVIAL {
        for slot in &mut destination[..count] {
            // SAFETY: `T::TRIVIAL` means a bitwise copy of `value` is a
            // valid clone and the original stays usable.
            slot.write(unsafe { ptr::read(value) });
        }
        // SAFETY: the loop above wrote the first `count` slots.
        return unsafe { assume_init_prefix(destination, count) };
    }
    unwrap_infallible(construct_each(destination, count, |_| Ok(value.clone())))
}

/// Fill every slot of `destination` with `T::default()`.
///
/// Non-trivial types get a fresh default per slot (not clones of one
/// default), with rollback if `Default` panics. Trivial types take one
/// default and block-fill it.
pub fn fill_default_uninitialized<T>(destination: &mut [MaybeUninit<T>]) -> &mut [T]
where
    T: Default + Lifecycle,
{
    let count = destination.len();
    if T::TRIVIAL {
        let value = T::default();
        for slot in destination.iter_mut() {
            // SAFETY: as in `fill_n_uninitialized`.
            slot.write(unsafe { ptr::read(&value) });
        }
        // SAFETY: every slot was written above.
        return unsafe { assume_init_prefix(destination, count) };
    }
    unwrap_infallible(construct_each(destination, count, |_| Ok(T::default())))
}

/// Construct `count` elements with a fallible constructor called with
/// each destination index.
///
/// The first `Err` destroys every element constructed in this call and is
/// returned as [`InitError::Construct`].
pub fn try_fill_n_uninitialized_with<T, E, F>(
    destination: &mut [MaybeUninit<T>],
    count: usize,
    mut make: F,
) -> Result<&mut [T], InitError<E>>
where
    F: FnMut(usize) -> Result<T, E>,
{
    construct_each(destination, count, |index| {
        make(index).map_err(|source| InitError::Construct { index, source })
    })
}
