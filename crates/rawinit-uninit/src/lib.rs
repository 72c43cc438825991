//! Commit-or-rollback bulk initialization of uninitialized memory.
//!
//! Every operation in this crate writes into a destination range that has
//! storage but no live elements (`&mut [MaybeUninit<T>]`) and returns the
//! initialized prefix it produced. Together with `rawinit-scratch`, this
//! is one of the two crates in the workspace that contains `unsafe` code.
//!
//! # Operation families
//!
//! | Family | Source | Fast path (trivial `T`) |
//! |--------|--------|-------------------------|
//! | [`copy_uninitialized`], [`copy_n_uninitialized`] | `&[T]` | `copy_nonoverlapping` |
//! | [`copy_n_uninitialized_iter`] | any iterator | none (element by element) |
//! | [`fill_uninitialized`], [`fill_n_uninitialized`] | one value | block fill |
//! | [`move_uninitialized`], [`move_n_uninitialized`] | `&mut [T]` | `copy_nonoverlapping` |
//! | [`copy_chars_uninitialized`] | byte / wide-char slices | `memmove` |
//!
//! # Commit or rollback
//!
//! On the non-trivial path each element is constructed through a
//! [`RollbackGuard`]. If a `Clone` impl panics, or a fallible constructor
//! passed to a `try_*` variant returns `Err`, the guard destroys every
//! element constructed so far before the failure leaves the call. The
//! destination never ends up partially initialized.
//!
//! ```
//! use std::mem::MaybeUninit;
//! use rawinit_uninit::copy_uninitialized;
//!
//! let source = vec![String::from("a"), String::from("b")];
//! let mut storage = [const { MaybeUninit::<String>::uninit() }; 4];
//! let copied = copy_uninitialized(&source, &mut storage);
//! assert_eq!(copied, &source[..]);
//! # unsafe { std::ptr::drop_in_place(copied) };
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod chars;
pub mod copy;
pub mod fill;
pub mod guard;
pub mod moves;
pub mod raw;

pub use chars::{copy_chars_overlapping, copy_chars_uninitialized, CharLike};
pub use copy::{
    copy_n_uninitialized, copy_n_uninitialized_iter, copy_uninitialized,
    try_copy_n_uninitialized_iter, try_copy_uninitialized_with,
};
pub use fill::{
    fill_default_uninitialized, fill_n_uninitialized, fill_uninitialized,
    try_fill_n_uninitialized_with,
};
pub use guard::RollbackGuard;
pub use moves::{move_n_uninitialized, move_uninitialized};
pub use rawinit_core::{InitError, Lifecycle};
