//! Allocator with a simulated memory ceiling.

// Implementing `ScratchAllocator::deallocate` requires an `unsafe fn`.
#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;

use indexmap::IndexMap;
use rawinit_scratch::{ScratchAllocator, SystemAllocator};
use smallvec::SmallVec;

/// Scratch allocator that refuses any request larger than a ceiling.
///
/// Accepted requests are served by the global allocator. Every request
/// size (accepted or not) is recorded in order, and every block still
/// outstanding is tracked by address so tests can check that each one is
/// released exactly once.
#[derive(Debug)]
pub struct CappedAllocator {
    ceiling_bytes: usize,
    requests: SmallVec<[usize; 8]>,
    outstanding: IndexMap<usize, Layout>,
    releases: usize,
    inner: SystemAllocator,
}

impl CappedAllocator {
    /// Refuse requests above `ceiling_bytes`.
    pub fn new(ceiling_bytes: usize) -> Self {
        Self {
            ceiling_bytes,
            requests: SmallVec::new(),
            outstanding: IndexMap::new(),
            releases: 0,
            inner: SystemAllocator,
        }
    }

    /// Refuse requests for more than `elements` values of `T`.
    pub fn for_elements<T>(elements: usize) -> Self {
        Self::new(elements.saturating_mul(std::mem::size_of::<T>()))
    }

    /// Refuse everything.
    pub fn exhausted() -> Self {
        Self::new(0)
    }

    /// Byte size of every request, in order.
    pub fn requests(&self) -> &[usize] {
        &self.requests
    }

    /// Request sizes converted to element counts of `T`.
    pub fn requested_elements<T>(&self) -> Vec<usize> {
        let size = std::mem::size_of::<T>().max(1);
        self.requests.iter().map(|bytes| bytes / size).collect()
    }

    /// Number of blocks handed out and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Number of blocks released so far.
    pub fn releases(&self) -> usize {
        self.releases
    }
}

impl ScratchAllocator for CappedAllocator {
    fn allocate(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        assert!(layout.size() > 0, "zero-sized scratch request");
        self.requests.push(layout.size());
        if layout.size() > self.ceiling_bytes {
            return None;
        }
        let block = self.inner.allocate(layout)?;
        self.outstanding.insert(block.as_ptr() as usize, layout);
        Some(block)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<u8>, layout: Layout) {
        let recorded = self.outstanding.shift_remove(&(ptr.as_ptr() as usize));
        assert_eq!(recorded, Some(layout), "release of unknown or mismatched block");
        self.releases += 1;
        // SAFETY: the block was handed out by `inner` with this layout
        // (checked against the record above) and is released once.
        unsafe { self.inner.deallocate(ptr, layout) };
    }
}
