//! rawinit: bulk initialization of uninitialized memory and best-effort
//! scratch buffers.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the rawinit sub-crates. For most users, adding `rawinit` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::mem::MaybeUninit;
//! use rawinit::prelude::*;
//!
//! // Copy into raw storage; trivial types take a single block copy.
//! let mut raw = [MaybeUninit::<u32>::uninit(); 8];
//! let copied = copy_uninitialized(&[1, 2, 3], &mut raw);
//! assert_eq!(copied, &[1, 2, 3]);
//! assert!(is_trivial_lifecycle::<u32>());
//!
//! // Ask for scratch space and adapt to what was granted.
//! let input: Vec<String> = (0..100).map(|i| i.to_string()).collect();
//! let mut scratch = TemporaryBuffer::<String>::uninit(input.len());
//! let staged = scratch.copy_from_slice(&input);
//! assert_eq!(staged, scratch.len());
//! assert_eq!(scratch.as_slice(), &input[..staged]);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for items not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`lifecycle`] | `rawinit-core` | `Lifecycle` classifier, `InitError` |
//! | [`uninit`] | `rawinit-uninit` | copy, fill and move into uninitialized storage |
//! | [`scratch`] | `rawinit-scratch` | `TemporaryBuffer`, allocator seam, config |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Lifecycle classification and error types (`rawinit-core`).
///
/// Implement [`lifecycle::Lifecycle`] for your own element types with
/// [`trivial_lifecycle!`] or [`non_trivial_lifecycle!`].
pub use rawinit_core as lifecycle;

/// Commit-or-rollback initialization of uninitialized ranges
/// (`rawinit-uninit`).
///
/// Also exposes the single-slot primitives in [`uninit::raw`] and the
/// [`uninit::RollbackGuard`] the bulk operations are built on.
pub use rawinit_uninit as uninit;

/// Best-effort temporary buffers (`rawinit-scratch`).
///
/// [`scratch::TemporaryBuffer`] with the default system allocator, or any
/// [`scratch::ScratchAllocator`] through its `*_in` constructors.
pub use rawinit_scratch as scratch;

pub use rawinit_core::{non_trivial_lifecycle, trivial_lifecycle};

/// Common imports for typical rawinit usage.
///
/// ```rust
/// use rawinit::prelude::*;
/// ```
pub mod prelude {
    // Classification and errors
    pub use rawinit_core::{
        is_trivial_lifecycle, InitError, Lifecycle, LifecycleClass, NonTrivial,
    };

    // Bulk operations
    pub use rawinit_uninit::{
        copy_chars_uninitialized, copy_n_uninitialized, copy_n_uninitialized_iter,
        copy_uninitialized, fill_default_uninitialized, fill_n_uninitialized,
        fill_uninitialized, move_n_uninitialized, move_uninitialized,
        try_copy_n_uninitialized_iter, try_copy_uninitialized_with,
        try_fill_n_uninitialized_with, RollbackGuard,
    };

    // Scratch space
    pub use rawinit_scratch::{ScratchAllocator, ScratchConfig, TemporaryBuffer};
}
