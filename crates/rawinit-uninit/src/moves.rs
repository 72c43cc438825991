//! Move a source range into uninitialized storage.
//!
//! The source keeps ownership of its slots: each moved-from element is
//! replaced by `T::default()`, so the source stays valid and can be
//! dropped normally afterwards. A failure rolls back the destination only;
//! elements already taken from the source are not put back.

use std::mem::{self, MaybeUninit};
use std::ptr;

use rawinit_core::Lifecycle;

use crate::guard::{assert_fits, construct_each, unwrap_infallible};
use crate::raw::assume_init_prefix;

/// Move every element of `source` into the front of `destination`.
///
/// Returns the initialized prefix of `destination`. For trivial types a
/// move is a copy, so the source is block-copied and left unchanged.
///
/// # Panics
///
/// Panics if `destination` is shorter than `source`, before anything is
/// moved. A panic from `T::default()` rolls back the destination.
pub fn move_uninitialized<'a, T>(
    source: &mut [T],
    destination: &'a mut [MaybeUninit<T>],
) -> &'a mut [T]
where
    T: Default + Lifecycle,
{
    let count = source.len();
    assert_fits(count, destination.len());
    if T::TRIVIAL {
        // SAFETY: trivial types are `Copy`, so the source remains valid
        // after a bitwise copy; the ranges are distinct borrows.
        unsafe {
            ptr::copy_nonoverlapping(source.as_ptr(), destination.as_mut_ptr().cast::<T>(), count);
            return assume_init_prefix(destination, count);
        }
    }
    unwrap_infallible(construct_each(destination, count, |index| {
        Ok(mem::take(&mut source[index]))
    }))
}

/// Move the first `count` elements of `source` into `destination`.
///
/// # Panics
///
/// Panics if `count > source.len()` or `count > destination.len()`.
pub fn move_n_uninitialized<'a, T>(
    source: &mut [T],
    count: usize,
    destination: &'a mut [MaybeUninit<T>],
) -> &'a mut [T]
where
    T: Default + Lifecycle,
{
    move_uninitialized(&mut source[..count], destination)
}
