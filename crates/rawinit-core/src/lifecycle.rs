//! Compile-time lifecycle classification of element types.
//!
//! A type has a **trivial lifecycle** when default construction, copy,
//! move and destruction are all plain byte operations with no side
//! effects. Bulk operations over such types collapse into single block
//! copies or fills; every other type goes through per-element
//! construction with rollback.
//!
//! The classification is an associated constant, so branching on it is
//! resolved when the generic operation is monomorphized:
//!
//! ```
//! use rawinit_core::{is_trivial_lifecycle, LifecycleClass};
//!
//! assert!(is_trivial_lifecycle::<u32>());
//! assert!(is_trivial_lifecycle::<[(u8, f64); 4]>());
//! assert!(!is_trivial_lifecycle::<String>());
//! assert_eq!(LifecycleClass::of::<Vec<u8>>(), LifecycleClass::NonTrivial);
//! ```
//!
//! Types outside this crate opt in with [`trivial_lifecycle!`] (checked:
//! the type must be `Copy`) or [`non_trivial_lifecycle!`]. A type that
//! cannot carry an impl here (a foreign type, under the orphan rule) is
//! wrapped in [`NonTrivial`], which always takes the per-element path:
//!
//! ```
//! use std::ops::Range;
//! use rawinit_core::{is_trivial_lifecycle, NonTrivial};
//!
//! let span = NonTrivial(0..4u32);
//! assert_eq!(span.len(), 4);
//! assert!(!is_trivial_lifecycle::<NonTrivial<Range<u32>>>());
//! ```
//!
//! [`trivial_lifecycle!`]: crate::trivial_lifecycle
//! [`non_trivial_lifecycle!`]: crate::non_trivial_lifecycle

#![allow(unsafe_code)]

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use std::ffi::{CString, OsString};
use std::fmt;
use std::marker::PhantomData;
use std::num::{
    NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI8, NonZeroIsize, NonZeroU16, NonZeroU32,
    NonZeroU64, NonZeroU8, NonZeroUsize,
};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::rc::{self, Rc};
use std::sync::{self, Arc, Mutex, RwLock};
use std::time::Duration;

/// Lifecycle classification of an element type.
///
/// The classification is conservative: anything uncertain is
/// `TRIVIAL = false`, which is always correct, only slower.
///
/// # Safety
///
/// Declaring `TRIVIAL = true` promises that `Self` is `Copy` (so it has no
/// drop glue) and that cloning a value is indistinguishable from copying
/// its bytes. Bulk operations rely on this to replace `Clone::clone` calls
/// with `ptr::copy_nonoverlapping` and to skip destruction entirely.
pub unsafe trait Lifecycle {
    /// `true` if copy, move and destruction are raw byte operations.
    const TRIVIAL: bool;
}

/// Returns whether `T` has a trivial lifecycle.
///
/// Zero-cost: the result is a constant for each `T`.
pub const fn is_trivial_lifecycle<T: Lifecycle>() -> bool {
    T::TRIVIAL
}

/// The two lifecycle classes, as a value.
///
/// Dispatch inside the bulk operations uses [`Lifecycle::TRIVIAL`]
/// directly; this enum is the value form, for callers that store or print
/// a classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleClass {
    /// Construction and destruction are byte copies with no side effects.
    Trivial,
    /// Construction and destruction must run through `Clone` / `Drop`.
    NonTrivial,
}

impl LifecycleClass {
    /// Classify `T`.
    pub const fn of<T: Lifecycle>() -> Self {
        if T::TRIVIAL {
            Self::Trivial
        } else {
            Self::NonTrivial
        }
    }

    /// `true` for [`LifecycleClass::Trivial`].
    pub const fn is_trivial(self) -> bool {
        matches!(self, Self::Trivial)
    }
}

impl fmt::Display for LifecycleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trivial => write!(f, "trivial"),
            Self::NonTrivial => write!(f, "non-trivial"),
        }
    }
}

/// Classify one or more `Copy` types as having a trivial lifecycle.
///
/// Fails to compile if a listed type is not `Copy`.
///
/// ```
/// #[derive(Clone, Copy)]
/// struct Rgb(u8, u8, u8);
///
/// rawinit_core::trivial_lifecycle!(Rgb);
/// assert!(rawinit_core::is_trivial_lifecycle::<Rgb>());
/// ```
///
/// ```compile_fail
/// struct Name(String);
/// rawinit_core::trivial_lifecycle!(Name);
/// ```
#[macro_export]
macro_rules! trivial_lifecycle {
    ($($ty:ty),+ $(,)?) => {
        $(
            const _: fn() = || {
                fn assert_copy<T: ::core::marker::Copy>() {}
                assert_copy::<$ty>();
            };

            // SAFETY: the type is `Copy` (asserted above), so it has no drop
            // glue and its `Clone` impl must agree with a bitwise copy.
            unsafe impl $crate::lifecycle::Lifecycle for $ty {
                const TRIVIAL: bool = true;
            }
        )+
    };
}

/// Classify one or more types as having a non-trivial lifecycle.
///
/// Always sound; use it for anything with a `Drop` impl, owned resources,
/// or a `Clone` impl with side effects.
///
/// ```
/// struct Handle(std::fs::File);
///
/// rawinit_core::non_trivial_lifecycle!(Handle);
/// assert!(!rawinit_core::is_trivial_lifecycle::<Handle>());
/// ```
#[macro_export]
macro_rules! non_trivial_lifecycle {
    ($($ty:ty),+ $(,)?) => {
        $(
            // SAFETY: `TRIVIAL = false` makes no promise about the type.
            unsafe impl $crate::lifecycle::Lifecycle for $ty {
                const TRIVIAL: bool = false;
            }
        )+
    };
}

crate::trivial_lifecycle!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, ()
);

crate::non_trivial_lifecycle!(String);

// SAFETY: raw pointers are `Copy` and dropping one does nothing.
unsafe impl<T: ?Sized> Lifecycle for *const T {
    const TRIVIAL: bool = true;
}

// SAFETY: as for `*const T`.
unsafe impl<T: ?Sized> Lifecycle for *mut T {
    const TRIVIAL: bool = true;
}

// SAFETY: shared references are `Copy` and have no drop glue.
unsafe impl<T: ?Sized> Lifecycle for &T {
    const TRIVIAL: bool = true;
}

// SAFETY: an array of `Copy` elements is `Copy`; when `T` is non-trivial
// the array is classified non-trivial as well.
unsafe impl<T: Lifecycle, const N: usize> Lifecycle for [T; N] {
    const TRIVIAL: bool = T::TRIVIAL;
}

// SAFETY: `Option<T>` is `Copy` whenever `T` is.
unsafe impl<T: Lifecycle> Lifecycle for Option<T> {
    const TRIVIAL: bool = T::TRIVIAL;
}

macro_rules! tuple_lifecycle {
    ($($name:ident),+) => {
        // SAFETY: a tuple is `Copy` when every component is; the constant
        // is only `true` when every component is trivial.
        unsafe impl<$($name: Lifecycle),+> Lifecycle for ($($name,)+) {
            const TRIVIAL: bool = true $(&& $name::TRIVIAL)+;
        }
    };
}

tuple_lifecycle!(A);
tuple_lifecycle!(A, B);
tuple_lifecycle!(A, B, C);
tuple_lifecycle!(A, B, C, D);
tuple_lifecycle!(A, B, C, D, E);
tuple_lifecycle!(A, B, C, D, E, F);
tuple_lifecycle!(A, B, C, D, E, F, G);
tuple_lifecycle!(A, B, C, D, E, F, G, H);
tuple_lifecycle!(A, B, C, D, E, F, G, H, I);
tuple_lifecycle!(A, B, C, D, E, F, G, H, I, J);
tuple_lifecycle!(A, B, C, D, E, F, G, H, I, J, K);
tuple_lifecycle!(A, B, C, D, E, F, G, H, I, J, K, L);

// SAFETY: `Result<T, E>` is `Copy` whenever both arms are.
unsafe impl<T: Lifecycle, E: Lifecycle> Lifecycle for Result<T, E> {
    const TRIVIAL: bool = T::TRIVIAL && E::TRIVIAL;
}

// SAFETY: `PhantomData` is a `Copy` zero-sized marker for every `T`.
unsafe impl<T: ?Sized> Lifecycle for PhantomData<T> {
    const TRIVIAL: bool = true;
}

// SAFETY: a unique reference is not `Copy`; duplicating its bytes would
// alias it.
unsafe impl<T: ?Sized> Lifecycle for &mut T {
    const TRIVIAL: bool = false;
}

macro_rules! fn_pointer_lifecycle {
    ($($arg:ident),*) => {
        // SAFETY: function pointers are `Copy` and have no drop glue.
        unsafe impl<Ret, $($arg),*> Lifecycle for fn($($arg),*) -> Ret {
            const TRIVIAL: bool = true;
        }
    };
}

fn_pointer_lifecycle!();
fn_pointer_lifecycle!(A);
fn_pointer_lifecycle!(A, B);
fn_pointer_lifecycle!(A, B, C);
fn_pointer_lifecycle!(A, B, C, D);
fn_pointer_lifecycle!(A, B, C, D, E);
fn_pointer_lifecycle!(A, B, C, D, E, F);

crate::trivial_lifecycle!(
    Duration,
    NonZeroU8,
    NonZeroU16,
    NonZeroU32,
    NonZeroU64,
    NonZeroUsize,
    NonZeroI8,
    NonZeroI16,
    NonZeroI32,
    NonZeroI64,
    NonZeroIsize,
);

crate::non_trivial_lifecycle!(PathBuf, OsString, CString);

macro_rules! owning_lifecycle {
    ($($owner:ident)::+ <$($param:ident),+> $(where $bound:ident: ?Sized)?) => {
        // SAFETY: `TRIVIAL = false` makes no promise about the type.
        unsafe impl<$($param),+> Lifecycle for $($owner)::+<$($param),+>
        $(where $bound: ?Sized)?
        {
            const TRIVIAL: bool = false;
        }
    };
}

owning_lifecycle!(Box<T> where T: ?Sized);
owning_lifecycle!(Rc<T> where T: ?Sized);
owning_lifecycle!(Arc<T> where T: ?Sized);
owning_lifecycle!(rc::Weak<T> where T: ?Sized);
owning_lifecycle!(sync::Weak<T> where T: ?Sized);
owning_lifecycle!(Cell<T> where T: ?Sized);
owning_lifecycle!(RefCell<T> where T: ?Sized);
owning_lifecycle!(Mutex<T> where T: ?Sized);
owning_lifecycle!(RwLock<T> where T: ?Sized);
owning_lifecycle!(Vec<T>);
owning_lifecycle!(VecDeque<T>);
owning_lifecycle!(LinkedList<T>);
owning_lifecycle!(BinaryHeap<T>);
owning_lifecycle!(BTreeSet<T>);
owning_lifecycle!(BTreeMap<K, V>);
owning_lifecycle!(HashSet<T, S>);
owning_lifecycle!(HashMap<K, V, S>);

// SAFETY: `TRIVIAL = false` makes no promise about the type.
unsafe impl<B: ?Sized + ToOwned> Lifecycle for Cow<'_, B> {
    const TRIVIAL: bool = false;
}

/// Wrapper that classifies any `T` as non-trivial.
///
/// Use it for element types that have no [`Lifecycle`] impl and cannot
/// be given one, such as types from other crates. Bulk operations over
/// `NonTrivial<T>` clone and drop each element through `T`'s own impls.
/// The wrapper is `repr(transparent)`, so `[NonTrivial<T>]` has the same
/// layout as `[T]`.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonTrivial<T>(pub T);

impl<T> NonTrivial<T> {
    /// Unwrap the value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for NonTrivial<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> Deref for NonTrivial<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for NonTrivial<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

// SAFETY: `TRIVIAL = false` makes no promise about the type.
unsafe impl<T> Lifecycle for NonTrivial<T> {
    const TRIVIAL: bool = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    crate::trivial_lifecycle!(Point);

    struct Owner {
        _name: String,
    }

    crate::non_trivial_lifecycle!(Owner);

    #[test]
    fn primitives_are_trivial() {
        assert!(is_trivial_lifecycle::<u8>());
        assert!(is_trivial_lifecycle::<i64>());
        assert!(is_trivial_lifecycle::<f32>());
        assert!(is_trivial_lifecycle::<char>());
        assert!(is_trivial_lifecycle::<bool>());
        assert!(is_trivial_lifecycle::<()>());
    }

    #[test]
    fn raw_pointers_and_shared_refs_are_trivial() {
        assert!(is_trivial_lifecycle::<*const String>());
        assert!(is_trivial_lifecycle::<*mut [u8]>());
        assert!(is_trivial_lifecycle::<&str>());
    }

    #[test]
    fn owning_types_are_non_trivial() {
        assert!(!is_trivial_lifecycle::<String>());
        assert!(!is_trivial_lifecycle::<Vec<u8>>());
        assert!(!is_trivial_lifecycle::<Box<u8>>());
        assert!(!is_trivial_lifecycle::<Rc<u8>>());
        assert!(!is_trivial_lifecycle::<Arc<str>>());
        assert!(!is_trivial_lifecycle::<VecDeque<u8>>());
    }

    #[test]
    fn aggregates_follow_their_components() {
        assert!(is_trivial_lifecycle::<[u16; 8]>());
        assert!(is_trivial_lifecycle::<(u8, f64, char)>());
        assert!(is_trivial_lifecycle::<Option<u32>>());
        assert!(!is_trivial_lifecycle::<[String; 2]>());
        assert!(!is_trivial_lifecycle::<(u8, String)>());
        assert!(!is_trivial_lifecycle::<Option<Vec<u8>>>());
    }

    #[test]
    fn opted_in_types_are_classified() {
        assert!(is_trivial_lifecycle::<Point>());
        assert!(is_trivial_lifecycle::<[Point; 3]>());
        assert!(!is_trivial_lifecycle::<Owner>());
        assert!(!is_trivial_lifecycle::<(Point, Owner)>());
    }

    #[test]
    fn class_of_matches_constant() {
        assert_eq!(LifecycleClass::of::<u64>(), LifecycleClass::Trivial);
        assert_eq!(LifecycleClass::of::<String>(), LifecycleClass::NonTrivial);
        assert!(LifecycleClass::of::<Point>().is_trivial());
        assert!(!LifecycleClass::of::<Owner>().is_trivial());
    }

    #[test]
    fn class_display() {
        assert_eq!(LifecycleClass::Trivial.to_string(), "trivial");
        assert_eq!(LifecycleClass::NonTrivial.to_string(), "non-trivial");
    }

    #[test]
    fn std_collections_and_cells_are_non_trivial() {
        assert!(!is_trivial_lifecycle::<BTreeMap<u8, u8>>());
        assert!(!is_trivial_lifecycle::<BTreeSet<u8>>());
        assert!(!is_trivial_lifecycle::<HashMap<String, u32>>());
        assert!(!is_trivial_lifecycle::<HashSet<u64>>());
        assert!(!is_trivial_lifecycle::<BinaryHeap<i32>>());
        assert!(!is_trivial_lifecycle::<LinkedList<u8>>());
        assert!(!is_trivial_lifecycle::<PathBuf>());
        assert!(!is_trivial_lifecycle::<OsString>());
        assert!(!is_trivial_lifecycle::<CString>());
        assert!(!is_trivial_lifecycle::<Cow<'static, str>>());
        assert!(!is_trivial_lifecycle::<Cell<u32>>());
        assert!(!is_trivial_lifecycle::<RefCell<u32>>());
        assert!(!is_trivial_lifecycle::<Mutex<u8>>());
        assert!(!is_trivial_lifecycle::<RwLock<u8>>());
        assert!(!is_trivial_lifecycle::<rc::Weak<u8>>());
        assert!(!is_trivial_lifecycle::<sync::Weak<str>>());
    }

    #[test]
    fn references_and_fn_pointers() {
        assert!(!is_trivial_lifecycle::<&mut u8>());
        assert!(!is_trivial_lifecycle::<&mut [u8]>());
        assert!(is_trivial_lifecycle::<fn()>());
        assert!(is_trivial_lifecycle::<fn(u8, String) -> bool>());
        assert!(is_trivial_lifecycle::<PhantomData<String>>());
        assert!(is_trivial_lifecycle::<Duration>());
        assert!(is_trivial_lifecycle::<NonZeroU32>());
    }

    #[test]
    fn result_is_trivial_only_when_both_arms_are() {
        assert!(is_trivial_lifecycle::<Result<u32, ()>>());
        assert!(!is_trivial_lifecycle::<Result<String, u8>>());
        assert!(!is_trivial_lifecycle::<Result<u8, Box<str>>>());
    }

    #[test]
    fn wide_tuples_follow_their_components() {
        type Twelve = (u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, char, bool);
        assert!(is_trivial_lifecycle::<Twelve>());
        assert!(!is_trivial_lifecycle::<(u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, u8, String)>());
    }

    #[test]
    fn non_trivial_wrapper_classifies_anything() {
        assert!(!is_trivial_lifecycle::<NonTrivial<u8>>());
        assert!(!is_trivial_lifecycle::<NonTrivial<std::ops::Range<u32>>>());
        assert!(!is_trivial_lifecycle::<[NonTrivial<std::time::Instant>; 2]>());
        assert_eq!(
            std::mem::size_of::<NonTrivial<[u64; 3]>>(),
            std::mem::size_of::<[u64; 3]>()
        );
    }

    #[test]
    fn non_trivial_wrapper_derefs_to_inner() {
        let mut wrapped = NonTrivial::from(vec![1u8, 2]);
        wrapped.push(3);
        assert_eq!(wrapped.len(), 3);
        assert_eq!(wrapped.clone().into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn classification_is_usable_in_const_context() {
        const TRIVIAL: bool = is_trivial_lifecycle::<[u8; 16]>();
        const CLASS: LifecycleClass = LifecycleClass::of::<String>();
        assert!(TRIVIAL);
        assert_eq!(CLASS, LifecycleClass::NonTrivial);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn wrapper_round_trips_and_keeps_ordering(a in any::<i64>(), b in any::<i64>()) {
                prop_assert_eq!(NonTrivial::from(a).into_inner(), a);
                prop_assert_eq!(NonTrivial(a).cmp(&NonTrivial(b)), a.cmp(&b));
                prop_assert_eq!(NonTrivial(a) == NonTrivial(b), a == b);
            }
        }
    }
}
