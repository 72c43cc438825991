//! Core types for the rawinit memory-initialization layer.
//!
//! This crate owns the two things every other rawinit crate agrees on:
//!
//! - the **lifecycle classification** of element types ([`Lifecycle`]),
//!   which decides whether bulk operations may use block memory copies
//!   instead of per-element construction;
//! - the **error vocabulary** ([`InitError`]) reported by fallible bulk
//!   operations.
//!
//! It performs no allocation and holds no state.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod error;
pub mod lifecycle;

pub use error::InitError;
pub use lifecycle::{is_trivial_lifecycle, Lifecycle, LifecycleClass, NonTrivial};
