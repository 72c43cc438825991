//! Test utilities and instrumented element types for rawinit development.
//!
//! - [`EventLog`] / [`Tracked`]: a non-trivial element type whose copies
//!   record every construction and destruction, so tests can assert the
//!   exact commit-or-rollback sequence.
//! - [`Tripwire`]: failure injection, either as a panic inside `Clone` or
//!   as an `Err` from a fallible constructor.
//! - [`CappedAllocator`]: a scratch allocator that refuses requests above a
//!   ceiling and records every request and release.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod alloc;
pub mod tracked;

pub use alloc::CappedAllocator;
pub use tracked::{Event, EventLog, Tracked, Tripped, Tripwire};
