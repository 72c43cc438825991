//! Copy a source range into uninitialized storage.

use std::mem::MaybeUninit;
use std::ptr;

use rawinit_core::{InitError, Lifecycle};

use crate::guard::{assert_fits, construct_each, unwrap_infallible};
use crate::raw::assume_init_prefix;

/// Copy every element of `source` into the front of `destination`.
///
/// Returns the initialized prefix of `destination`, which has
/// `source.len()` elements. Trivial types are copied with one
/// `copy_nonoverlapping`; everything else is cloned element by element,
/// and a panicking `Clone` destroys the copies made so far before the
/// panic propagates.
///
/// The returned elements are owned by the caller's storage: nothing drops
/// them automatically.
///
/// # Panics
///
/// Panics if `destination` is shorter than `source`, before any element is
/// constructed.
pub fn copy_uninitialized<'a, T>(source: &[T], destination: &'a mut [MaybeUninit<T>]) -> &'a mut [T]
where
    T: Clone + Lifecycle,
{
    let count = source.len();
    assert_fits(count, destination.len());
    if T::TRIVIAL {
        // SAFETY: `T::TRIVIAL` means a bitwise copy is a valid clone; the
        // destination has room for `count` elements (checked above) and
        // cannot overlap the shared `source` borrow.
        unsafe {
            ptr::copy_nonoverlapping(source.as_ptr(), destination.as_mut_ptr().cast::<T>(), count);
            return assume_init_prefix(destination, count);
        }
    }
    unwrap_infallible(construct_each(destination, count, |index| {
        Ok(source[index].clone())
    }))
}

/// Copy the first `count` elements of `source` into `destination`.
///
/// Random-access form: delegates to [`copy_uninitialized`] over
/// `source[..count]`.
///
/// # Panics
///
/// Panics if `count > source.len()` or `count > destination.len()`.
pub fn copy_n_uninitialized<'a, T>(
    source: &[T],
    count: usize,
    destination: &'a mut [MaybeUninit<T>],
) -> &'a mut [T]
where
    T: Clone + Lifecycle,
{
    copy_uninitialized(&source[..count], destination)
}

/// Construct `count` elements taken from a forward-only source.
///
/// Elements are pulled one at a time. If the source yields fewer than
/// `count` elements the ones already written are destroyed and
/// [`InitError::SourceExhausted`] is returned.
pub fn copy_n_uninitialized_iter<'a, T, I>(
    source: I,
    count: usize,
    destination: &'a mut [MaybeUninit<T>],
) -> Result<&'a mut [T], InitError>
where
    I: IntoIterator<Item = T>,
{
    try_copy_n_uninitialized_iter(source.into_iter().map(Ok), count, destination)
}

/// Fallible form of [`copy_n_uninitialized_iter`]: the source yields
/// `Result<T, E>` and the first `Err` rolls back the destination.
pub fn try_copy_n_uninitialized_iter<'a, T, E, I>(
    source: I,
    count: usize,
    destination: &'a mut [MaybeUninit<T>],
) -> Result<&'a mut [T], InitError<E>>
where
    I: IntoIterator<Item = Result<T, E>>,
{
    let mut source = source.into_iter();
    construct_each(destination, count, |index| match source.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(source)) => Err(InitError::Construct { index, source }),
        None => Err(InitError::SourceExhausted {
            expected: count,
            yielded: index,
        }),
    })
}

/// Copy `source` into `destination` through a fallible constructor.
///
/// `clone` is called once per element in order. The first `Err` destroys
/// every element already constructed and is returned as
/// [`InitError::Construct`]. There is no trivial fast path: the
/// constructor is always called.
pub fn try_copy_uninitialized_with<'a, T, E, F>(
    source: &[T],
    destination: &'a mut [MaybeUninit<T>],
    mut clone: F,
) -> Result<&'a mut [T], InitError<E>>
where
    F: FnMut(&T) -> Result<T, E>,
{
    construct_each(destination, source.len(), |index| {
        clone(&source[index]).map_err(|source| InitError::Construct { index, source })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::destroy_range;
    use rawinit_test_utils::{EventLog, Tracked, Tripped, Tripwire};

    fn slots<T>(n: usize) -> Vec<MaybeUninit<T>> {
        (0..n).map(|_| MaybeUninit::uninit()).collect()
    }

    #[test]
    fn trivial_copy_matches_source() {
        let source = [1u32, 2, 3, 4];
        let mut storage = slots::<u32>(6);
        let copied = copy_uninitialized(&source, &mut storage);
        assert_eq!(copied, &source);
        assert_eq!(copied.len(), source.len());
    }

    #[test]
    fn returned_end_is_destination_plus_length() {
        let source = [7i64; 3];
        let mut storage = slots::<i64>(5);
        let start = storage.as_ptr().cast::<i64>();
        let copied = copy_uninitialized(&source, &mut storage);
        let end = copied.as_ptr_range().end;
        assert_eq!(end, start.wrapping_add(3));
    }

    #[test]
    fn non_trivial_copy_clones_each_element() {
        let source = vec!["alpha".to_string(), "beta".to_string()];
        let mut storage = slots::<String>(2);
        let copied = copy_uninitialized(&source, &mut storage);
        assert_eq!(copied, &source[..]);
        unsafe { destroy_range(copied.as_mut_ptr(), copied.len()) };
    }

    #[test]
    fn empty_source_constructs_nothing() {
        let log = EventLog::new();
        let source: Vec<Tracked> = Vec::new();
        let mut storage = slots::<Tracked>(2);
        let copied = copy_uninitialized(&source, &mut storage);
        assert!(copied.is_empty());
        assert_eq!(log.constructs(), 0);
    }

    #[test]
    #[should_panic(expected = "destination too short")]
    fn short_destination_panics() {
        let mut storage = slots::<u8>(1);
        copy_uninitialized(&[1u8, 2], &mut storage);
    }

    #[test]
    fn panicking_clone_rolls_back() {
        let log = EventLog::new();
        let trip = Tripwire::after(2);
        let source: Vec<Tracked> = (0..5).map(|v| Tracked::armed(v, &log, &trip)).collect();
        let mut storage = slots::<Tracked>(5);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            copy_uninitialized(&source, &mut storage);
        }));

        assert!(result.is_err());
        assert_eq!(log.constructs(), 2);
        assert_eq!(log.destroys(), 2);
        assert_eq!(log.live(), 0);
    }

    #[test]
    fn copy_n_uses_prefix_of_source() {
        let source = [9u16, 8, 7, 6];
        let mut storage = slots::<u16>(4);
        let copied = copy_n_uninitialized(&source, 2, &mut storage);
        assert_eq!(copied, &[9, 8]);
    }

    #[test]
    fn copy_n_iter_pulls_exactly_count() {
        let mut storage = slots::<u64>(4);
        let mut source = 10u64..;
        let copied = copy_n_uninitialized_iter(source.by_ref(), 3, &mut storage).unwrap();
        assert_eq!(copied, &[10, 11, 12]);
        assert_eq!(source.next(), Some(13));
    }

    #[test]
    fn copy_n_iter_short_source_rolls_back() {
        let log = EventLog::new();
        let source = (0..2).map(|v| Tracked::new(v, &log).clone());
        let mut storage = slots::<Tracked>(4);
        let err = copy_n_uninitialized_iter(source, 4, &mut storage).unwrap_err();
        assert_eq!(
            err,
            InitError::SourceExhausted {
                expected: 4,
                yielded: 2,
            }
        );
        assert_eq!(log.live(), 0);
    }

    #[test]
    fn try_copy_n_iter_stops_at_first_error() {
        let mut storage = slots::<String>(3);
        let source = vec![Ok("a".to_string()), Err("bad"), Ok("c".to_string())];
        let err = try_copy_n_uninitialized_iter(source, 3, &mut storage).unwrap_err();
        assert_eq!(
            err,
            InitError::Construct {
                index: 1,
                source: "bad",
            }
        );
    }

    #[test]
    fn try_copy_with_rolls_back_on_err() {
        let log = EventLog::new();
        let trip = Tripwire::after(3);
        let source: Vec<Tracked> = (0..5).map(|v| Tracked::new(v, &log)).collect();
        let mut storage = slots::<Tracked>(5);

        let err = try_copy_uninitialized_with(&source, &mut storage, |t| {
            trip.check()?;
            Ok::<_, Tripped>(t.clone())
        })
        .unwrap_err();

        assert_eq!(err.failed_index(), Some(3));
        assert_eq!(log.constructs(), 3);
        assert_eq!(log.destroys(), 3);
    }

    #[test]
    fn try_copy_with_reports_short_destination() {
        let mut storage = slots::<u8>(1);
        let err = try_copy_uninitialized_with(&[1u8, 2, 3], &mut storage, |v| Ok::<_, ()>(*v))
            .unwrap_err();
        assert_eq!(
            err,
            InitError::DestinationTooShort {
                required: 3,
                available: 1,
            }
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn trivial_copy_is_elementwise_equal(
                source in proptest::collection::vec(any::<i32>(), 0..64),
                spare in 0usize..8,
            ) {
                let mut storage = slots::<i32>(source.len() + spare);
                let copied = copy_uninitialized(&source, &mut storage);
                prop_assert_eq!(&*copied, &source[..]);
            }

            #[test]
            fn non_trivial_copy_is_elementwise_equal(
                source in proptest::collection::vec(".{0,8}", 0..32),
            ) {
                let mut storage = slots::<String>(source.len());
                let copied = copy_uninitialized(&source, &mut storage);
                prop_assert_eq!(&*copied, &source[..]);
                unsafe { destroy_range(copied.as_mut_ptr(), copied.len()) };
            }

            #[test]
            fn failure_at_k_constructs_then_destroys_k(
                (n, k) in (1u32..16).prop_flat_map(|n| (Just(n), 0..n)),
            ) {
                let log = EventLog::new();
                let trip = Tripwire::after(k as usize);
                let source: Vec<Tracked> =
                    (0..n).map(|v| Tracked::armed(v, &log, &trip)).collect();
                let mut storage = slots::<Tracked>(n as usize);
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    copy_uninitialized(&source, &mut storage);
                }));
                prop_assert!(result.is_err());
                prop_assert_eq!(log.constructs(), k as usize);
                prop_assert_eq!(log.destroys(), k as usize);
            }
        }
    }
}
