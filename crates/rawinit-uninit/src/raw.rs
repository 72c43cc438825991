//! Construct-at-address and destroy-at-address primitives.
//!
//! These are the only places where element lifetimes begin and end. All
//! bulk operations and the scratch buffer go through them.

use std::mem::{self, MaybeUninit};
use std::ptr;
use std::slice;

/// Begin the lifetime of `value` at `slot`.
///
/// # Safety
///
/// `slot` must be valid for writes, properly aligned, and must not hold a
/// live value (it would be overwritten without being dropped).
#[inline]
pub unsafe fn construct_at<T>(slot: *mut T, value: T) {
    // SAFETY: guaranteed by the caller.
    unsafe { slot.write(value) }
}

/// End the lifetime of the value at `slot`.
///
/// # Safety
///
/// `slot` must point to a live, properly aligned `T`. After the call the
/// slot is uninitialized.
#[inline]
pub unsafe fn destroy_at<T>(slot: *mut T) {
    // SAFETY: guaranteed by the caller.
    unsafe { ptr::drop_in_place(slot) }
}

/// End the lifetime of `len` consecutive values starting at `first`, in
/// forward order.
///
/// A no-op for types without drop glue. If one destructor panics the
/// remaining elements are still destroyed.
///
/// # Safety
///
/// `first..first + len` must be live, properly aligned values of `T`.
#[inline]
pub unsafe fn destroy_range<T>(first: *mut T, len: usize) {
    if !mem::needs_drop::<T>() || len == 0 {
        return;
    }
    // SAFETY: guaranteed by the caller.
    unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first, len)) }
}

/// View the first `len` slots of `slots` as initialized.
///
/// # Safety
///
/// `len <= slots.len()` and the first `len` slots must hold live values.
#[inline]
pub(crate) unsafe fn assume_init_prefix<T>(slots: &mut [MaybeUninit<T>], len: usize) -> &mut [T] {
    debug_assert!(len <= slots.len());
    // SAFETY: `MaybeUninit<T>` has the same layout as `T`; the caller
    // guarantees the prefix is initialized.
    unsafe { slice::from_raw_parts_mut(slots.as_mut_ptr().cast::<T>(), len) }
}
