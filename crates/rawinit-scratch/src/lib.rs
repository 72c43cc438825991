//! Best-effort temporary buffers for algorithms that need scratch space.
//!
//! A [`TemporaryBuffer`] asks for room for N elements and takes what it can
//! get: on allocation failure it halves the request and retries until it
//! succeeds or reaches zero. Callers check [`TemporaryBuffer::len`] and
//! adapt (smaller batches, or an in-place fallback when it is zero).
//! Running short of memory is a normal outcome here, never an error.
//!
//! ```
//! use rawinit_scratch::TemporaryBuffer;
//!
//! let input = vec![5u32, 3, 8, 1];
//! let mut scratch = TemporaryBuffer::for_range_uninit(&input);
//! assert_eq!(scratch.requested_len(), 4);
//! if scratch.len() >= input.len() {
//!     let staged = scratch.copy_from_slice(&input);
//!     assert_eq!(staged, 4);
//!     assert_eq!(scratch.as_slice(), &input[..]);
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! TemporaryBuffer<T, A>
//! ├── ScratchConfig   (request ceiling in bytes)
//! ├── A: ScratchAllocator (SystemAllocator by default)
//! └── rawinit-uninit  (default fill, copy-in, teardown)
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod alloc;
pub mod buffer;
pub mod config;

pub use alloc::{ScratchAllocator, SystemAllocator};
pub use buffer::TemporaryBuffer;
pub use config::ScratchConfig;
