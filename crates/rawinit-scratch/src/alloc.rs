//! Allocation seam for temporary buffers.

use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

/// Source of raw memory for [`TemporaryBuffer`](crate::TemporaryBuffer).
///
/// Failure is reported as `None`, never by panicking or aborting: the
/// buffer treats it as a signal to ask for less.
pub trait ScratchAllocator {
    /// Allocate a block for `layout`. `layout.size()` is never zero.
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>>;

    /// Release a block previously returned by [`allocate`](Self::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` on this allocator with the same
    /// `layout`, and must not have been released already.
    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: Layout);
}

impl<A: ScratchAllocator + ?Sized> ScratchAllocator for &mut A {
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded contract.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}

/// The global allocator.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAllocator;

impl ScratchAllocator for SystemAllocator {
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None;
        }
        // SAFETY: `layout` has non-zero size.
        NonNull::new(unsafe { alloc(layout) })
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: guaranteed by the caller.
        unsafe { dealloc(ptr.as_ptr(), layout) }
    }
}
