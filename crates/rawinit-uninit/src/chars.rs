//! Byte and wide-character fast path.
//!
//! Character data is flat and overlap-tolerant, so copies go straight to
//! `ptr::copy` (`memmove`) without consulting the lifecycle classifier.

use std::mem::MaybeUninit;
use std::ptr;

use rawinit_core::Lifecycle;

use crate::guard::assert_fits;
use crate::raw::assume_init_prefix;

mod sealed {
    pub trait Sealed {}
}

/// Element types eligible for the character fast path: narrow and wide
/// code units.
pub trait CharLike: Copy + Lifecycle + sealed::Sealed {}

macro_rules! char_like {
    ($($ty:ty),+) => {
        $(
            impl sealed::Sealed for $ty {}
            impl CharLike for $ty {}
        )+
    };
}

char_like!(u8, i8, u16, u32, char);

/// Copy character data into uninitialized storage with one block move.
///
/// Returns the initialized prefix of `destination`.
///
/// # Panics
///
/// Panics if `destination` is shorter than `source`.
pub fn copy_chars_uninitialized<'a, C: CharLike>(
    source: &[C],
    destination: &'a mut [MaybeUninit<C>],
) -> &'a mut [C] {
    let count = source.len();
    assert_fits(count, destination.len());
    // SAFETY: both ranges hold at least `count` elements of `C`; `copy`
    // is used so the call is correct even for aliasing raw storage.
    unsafe {
        ptr::copy(source.as_ptr(), destination.as_mut_ptr().cast::<C>(), count);
        assume_init_prefix(destination, count)
    }
}

/// Copy `count` code units from `first` to `result`, tolerating overlap,
/// and return the position one past the last unit written.
///
/// # Safety
///
/// `first` must be valid for reads and `result` valid for writes of
/// `count` elements, both properly aligned. The ranges may overlap.
pub unsafe fn copy_chars_overlapping<C: CharLike>(
    first: *const C,
    count: usize,
    result: *mut C,
) -> *mut C {
    // SAFETY: guaranteed by the caller; `ptr::copy` permits overlap.
    unsafe {
        ptr::copy(first, result, count);
        result.add(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_bytes() {
        let source = b"hello, world";
        let mut storage = [MaybeUninit::<u8>::uninit(); 16];
        let copied = copy_chars_uninitialized(source, &mut storage);
        assert_eq!(copied, b"hello, world");
    }

    #[test]
    fn copies_wide_units_by_element_count() {
        let source: Vec<u16> = "wide text".encode_utf16().collect();
        let mut storage = [MaybeUninit::<u16>::uninit(); 9];
        let copied = copy_chars_uninitialized(&source, &mut storage);
        assert_eq!(copied, &source[..]);
        assert_eq!(String::from_utf16(copied).unwrap(), "wide text");
    }

    #[test]
    fn copies_chars() {
        let source: Vec<char> = "ünïcødé".chars().collect();
        let mut storage = [MaybeUninit::<char>::uninit(); 7];
        let copied = copy_chars_uninitialized(&source, &mut storage);
        assert_eq!(copied.iter().collect::<String>(), "ünïcødé");
    }

    #[test]
    fn overlapping_forward_shift() {
        let mut buf = *b"abcdef__";
        let base = buf.as_mut_ptr();
        let end = unsafe { copy_chars_overlapping(base, 6, base.add(2)) };
        assert_eq!(&buf, b"ababcdef");
        assert_eq!(end, unsafe { base.add(8) });
    }

    #[test]
    fn overlapping_backward_shift() {
        let mut buf: Vec<u32> = vec![0, 0, 1, 2, 3, 4];
        let base = buf.as_mut_ptr();
        let end = unsafe { copy_chars_overlapping(base.add(2), 4, base) };
        assert_eq!(buf[..4], [1, 2, 3, 4]);
        assert_eq!(end, unsafe { base.add(4) });
    }

    #[test]
    #[should_panic(expected = "destination too short")]
    fn short_destination_panics() {
        let mut storage = [MaybeUninit::<u8>::uninit(); 2];
        copy_chars_uninitialized(b"abc", &mut storage);
    }
}
