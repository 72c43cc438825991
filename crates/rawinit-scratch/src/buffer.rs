//! Temporary buffer with geometric back-off on allocation failure.
//!
//! Acquisition:
//!
//! 1. The requested length is recorded as given.
//! 2. It is clamped to [`ScratchConfig::max_elements`].
//! 3. Allocation is attempted; each failure halves the length, down to 0.
//! 4. Optionally, the storage is filled with default-constructed (or
//!    caller-constructed) values through `rawinit-uninit`.
//! 5. A failed fill is rolled back and the memory released; the buffer
//!    then reports length 0 rather than failing the caller.

use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr::NonNull;
use std::slice;

use rawinit_core::Lifecycle;
use rawinit_uninit::raw::destroy_range;
use rawinit_uninit::{
    copy_uninitialized, fill_default_uninitialized, try_fill_n_uninitialized_with,
};
use tracing::{debug, trace, warn};

use crate::alloc::{ScratchAllocator, SystemAllocator};
use crate::config::ScratchConfig;

/// Owned, best-effort scratch storage for up to `requested_len()` elements.
///
/// [`len`](Self::len) is what was actually obtained and may be anything
/// from 0 to the requested length. The first [`live_len`](Self::live_len)
/// slots hold live elements; the rest are uninitialized.
///
/// The buffer is the single owner of its memory: it is not `Clone`, and
/// dropping it destroys the live elements and releases the memory exactly
/// once.
pub struct TemporaryBuffer<T, A: ScratchAllocator = SystemAllocator> {
    ptr: Option<NonNull<T>>,
    layout: Option<Layout>,
    len: usize,
    requested: usize,
    live: usize,
    allocator: A,
    _owns: PhantomData<T>,
}

impl<T> TemporaryBuffer<T> {
    /// Acquire uninitialized room for up to `requested` elements from the
    /// global allocator, with the default [`ScratchConfig`].
    pub fn uninit(requested: usize) -> Self {
        Self::acquire_in(requested, SystemAllocator, &ScratchConfig::default())
    }

    /// Acquire uninitialized room sized after `range`.
    ///
    /// `range` is only measured; its elements are never touched.
    pub fn for_range_uninit(range: &[T]) -> Self {
        Self::uninit(range.len())
    }

    /// Acquire room sized after `range` and fill it with `T::default()`.
    ///
    /// A panic from `T::default()` propagates (see
    /// [`acquire_filled_in`](TemporaryBuffer::acquire_filled_in)); use
    /// [`for_range_with`](Self::for_range_with) to get an empty buffer
    /// instead.
    pub fn for_range(range: &[T]) -> Self
    where
        T: Default + Lifecycle,
    {
        Self::acquire_filled_in(range.len(), SystemAllocator, &ScratchConfig::default())
    }

    /// Acquire room sized after `range` and fill slot `i` with `init(i)`.
    ///
    /// If `init` fails the buffer comes back empty (see
    /// [`acquire_with_in`](Self::acquire_with_in)).
    pub fn for_range_with<E, F>(range: &[T], init: F) -> Self
    where
        E: fmt::Display,
        F: FnMut(usize) -> Result<T, E>,
    {
        Self::acquire_with_in(range.len(), SystemAllocator, &ScratchConfig::default(), init)
    }
}

impl<T, A: ScratchAllocator> TemporaryBuffer<T, A> {
    /// Acquire uninitialized room for up to `requested` elements from
    /// `allocator`, halving the request on each refusal.
    ///
    /// Never fails: under memory pressure the buffer is simply shorter, and
    /// a request of 0 (or a total refusal) yields an empty buffer that owns
    /// no memory. The allocator is never asked for zero bytes.
    pub fn acquire_in(requested: usize, allocator: A, config: &ScratchConfig) -> Self {
        let mut buffer = Self {
            ptr: None,
            layout: None,
            len: 0,
            requested,
            live: 0,
            allocator,
            _owns: PhantomData,
        };
        buffer.allocate(config);
        buffer
    }

    /// Like [`acquire_in`](Self::acquire_in), then fill every obtained
    /// slot with `T::default()`.
    ///
    /// Non-trivial types get one fresh default per slot; trivial types are
    /// block-filled.
    ///
    /// # Panics
    ///
    /// Unlike every other way acquisition can go wrong, a panic from
    /// `T::default()` is not turned into an empty buffer: the defaults
    /// built so far are destroyed, the memory is released, and the panic
    /// propagates to the caller. When element construction can fail, build
    /// elements with [`acquire_with_in`](Self::acquire_with_in) and return
    /// `Err` instead; that path degrades to a zero-length buffer.
    pub fn acquire_filled_in(requested: usize, allocator: A, config: &ScratchConfig) -> Self
    where
        T: Default + Lifecycle,
    {
        let mut buffer = Self::acquire_in(requested, allocator, config);
        buffer.live = fill_default_uninitialized(buffer.storage_mut()).len();
        buffer
    }

    /// Like [`acquire_in`](Self::acquire_in), then fill slot `i` with
    /// `init(i)`.
    ///
    /// If `init` returns `Err`, the elements built so far are destroyed,
    /// the memory is released and the buffer reports length 0. There is no
    /// retry with a smaller length: only allocation refusals shrink the
    /// request.
    pub fn acquire_with_in<E, F>(
        requested: usize,
        allocator: A,
        config: &ScratchConfig,
        init: F,
    ) -> Self
    where
        E: fmt::Display,
        F: FnMut(usize) -> Result<T, E>,
    {
        let mut buffer = Self::acquire_in(requested, allocator, config);
        let len = buffer.len;
        let outcome = try_fill_n_uninitialized_with(buffer.storage_mut(), len, init)
            .map(|filled| filled.len());
        match outcome {
            Ok(filled) => buffer.live = filled,
            Err(err) => {
                warn!(
                    requested,
                    acquired = len,
                    error = %err,
                    "scratch buffer fill failed; releasing"
                );
                buffer.release();
            }
        }
        buffer
    }

    fn allocate(&mut self, config: &ScratchConfig) {
        let mut len = self.requested.min(config.max_elements::<T>());
        if len < self.requested {
            debug!(
                requested = self.requested,
                clamped = len,
                "scratch request clamped to ceiling"
            );
        }
        if mem::size_of::<T>() == 0 {
            if len > 0 {
                self.ptr = Some(NonNull::dangling());
                self.len = len;
            }
            return;
        }
        while len > 0 {
            if let Ok(layout) = Layout::array::<T>(len) {
                if let Some(block) = self.allocator.allocate(layout) {
                    self.ptr = Some(block.cast::<T>());
                    self.layout = Some(layout);
                    self.len = len;
                    debug!(
                        requested = self.requested,
                        acquired = len,
                        "scratch buffer acquired"
                    );
                    return;
                }
            }
            debug!(attempted = len, next = len / 2, "scratch allocation refused; halving");
            len /= 2;
        }
        if self.requested > 0 {
            debug!(requested = self.requested, "no scratch space available");
        }
    }

    /// Destroy live elements and give the memory back. Leaves an empty,
    /// ownerless buffer; calling it again is a no-op.
    fn release(&mut self) {
        self.clear();
        if let (Some(ptr), Some(layout)) = (self.ptr, self.layout.take()) {
            // SAFETY: `ptr` and `layout` came from one successful
            // `allocate` call on `self.allocator` and are released once
            // (`layout` was taken above).
            unsafe { self.allocator.deallocate(ptr.cast::<u8>(), layout) };
            trace!(len = self.len, "scratch buffer released");
        }
        self.ptr = None;
        self.len = 0;
    }

    /// Every slot, live or not.
    fn storage_mut(&mut self) -> &mut [MaybeUninit<T>] {
        match self.ptr {
            // SAFETY: `ptr` owns `len` slots of `T` while `self` is alive,
            // and `&mut self` makes this borrow unique.
            Some(ptr) => unsafe {
                slice::from_raw_parts_mut(ptr.as_ptr().cast::<MaybeUninit<T>>(), self.len)
            },
            None => &mut [],
        }
    }

    /// Number of elements of storage actually obtained.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of elements originally asked for.
    pub fn requested_len(&self) -> usize {
        self.requested
    }

    /// `true` if no storage was obtained.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `true` if less storage was obtained than requested.
    pub fn is_short(&self) -> bool {
        self.len < self.requested
    }

    /// Number of live elements at the front of the buffer.
    pub fn live_len(&self) -> usize {
        self.live
    }

    /// Start of the storage; `None` when [`len`](Self::len) is 0.
    pub fn as_ptr(&self) -> Option<NonNull<T>> {
        self.ptr
    }

    /// Size of the obtained storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.len * mem::size_of::<T>()
    }

    /// The allocator backing this buffer.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// The live elements.
    pub fn as_slice(&self) -> &[T] {
        match self.ptr {
            // SAFETY: the first `live` slots are initialized.
            Some(ptr) => unsafe { slice::from_raw_parts(ptr.as_ptr(), self.live) },
            None => &[],
        }
    }

    /// The live elements, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self.ptr {
            // SAFETY: the first `live` slots are initialized and `&mut self`
            // makes the borrow unique.
            Some(ptr) => unsafe { slice::from_raw_parts_mut(ptr.as_ptr(), self.live) },
            None => &mut [],
        }
    }

    /// The uninitialized slots after the live elements.
    ///
    /// Write into them and then call [`set_live_len`](Self::set_live_len)
    /// to take ownership of what was written.
    pub fn spare_capacity_mut(&mut self) -> &mut [MaybeUninit<T>] {
        let live = self.live;
        &mut self.storage_mut()[live..]
    }

    /// Declare the first `live` slots initialized.
    ///
    /// # Safety
    ///
    /// `live <= self.len()` and every slot below `live` must hold a live
    /// value. Slots that were live and are now beyond `live` are leaked.
    pub unsafe fn set_live_len(&mut self, live: usize) {
        debug_assert!(live <= self.len);
        self.live = live;
    }

    /// Destroy every live element, keeping the storage.
    pub fn clear(&mut self) {
        let live = mem::replace(&mut self.live, 0);
        if let Some(ptr) = self.ptr {
            // SAFETY: the first `live` slots were initialized; `self.live`
            // is already 0, so a panicking destructor cannot cause a second
            // destruction from `Drop`.
            unsafe { destroy_range(ptr.as_ptr(), live) };
        }
    }

    /// Replace the contents with copies of the front of `source`.
    ///
    /// Destroys the current live elements, then copies
    /// `min(source.len(), self.len())` elements with commit-or-rollback.
    /// Returns the number copied.
    pub fn copy_from_slice(&mut self, source: &[T]) -> usize
    where
        T: Clone + Lifecycle,
    {
        self.clear();
        let count = source.len().min(self.len);
        let copied = copy_uninitialized(&source[..count], self.storage_mut()).len();
        self.live = copied;
        copied
    }
}

impl<T, A: ScratchAllocator> Drop for TemporaryBuffer<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T, A: ScratchAllocator> fmt::Debug for TemporaryBuffer<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryBuffer")
            .field("len", &self.len)
            .field("requested", &self.requested)
            .field("live", &self.live)
            .finish_non_exhaustive()
    }
}

// SAFETY: the buffer uniquely owns its elements and allocator, like `Vec`.
unsafe impl<T: Send, A: ScratchAllocator + Send> Send for TemporaryBuffer<T, A> {}

// SAFETY: shared access only hands out `&T` and `&A`.
unsafe impl<T: Sync, A: ScratchAllocator + Sync> Sync for TemporaryBuffer<T, A> {}
