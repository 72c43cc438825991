//! Error types for fallible bulk initialization.

use std::convert::Infallible;
use std::error::Error;
use std::fmt;

/// Errors reported by the fallible (`try_*`) bulk operations.
///
/// Whenever one of these is returned, the destination range holds no live
/// elements: anything constructed before the failure has already been
/// destroyed.
///
/// `E` is the error type of the caller-supplied constructor. Operations
/// whose constructors cannot fail use the default, [`Infallible`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitError<E = Infallible> {
    /// The destination range is shorter than the number of elements to
    /// write. Detected before any element is constructed.
    DestinationTooShort {
        /// Number of elements the operation needed to write.
        required: usize,
        /// Number of slots in the destination range.
        available: usize,
    },
    /// A positional source ran out before `expected` elements were read.
    SourceExhausted {
        /// Number of elements requested from the source.
        expected: usize,
        /// Number of elements the source actually produced.
        yielded: usize,
    },
    /// Constructing the element at `index` failed.
    Construct {
        /// Destination index of the element that failed to construct.
        index: usize,
        /// The constructor's error.
        source: E,
    },
}

impl<E> InitError<E> {
    /// Destination index at which construction failed, if this is a
    /// construction failure.
    pub fn failed_index(&self) -> Option<usize> {
        match self {
            Self::Construct { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Convert the constructor error with `f`, keeping every other field.
    pub fn map_source<F, O>(self, f: F) -> InitError<O>
    where
        F: FnOnce(E) -> O,
    {
        match self {
            Self::DestinationTooShort {
                required,
                available,
            } => InitError::DestinationTooShort {
                required,
                available,
            },
            Self::SourceExhausted { expected, yielded } => {
                InitError::SourceExhausted { expected, yielded }
            }
            Self::Construct { index, source } => InitError::Construct {
                index,
                source: f(source),
            },
        }
    }
}

impl<E: fmt::Display> fmt::Display for InitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DestinationTooShort {
                required,
                available,
            } => {
                write!(
                    f,
                    "destination too short: {required} elements required, {available} slots available"
                )
            }
            Self::SourceExhausted { expected, yielded } => {
                write!(
                    f,
                    "source exhausted: expected {expected} elements, got {yielded}"
                )
            }
            Self::Construct { index, source } => {
                write!(f, "construction of element {index} failed: {source}")
            }
        }
    }
}

impl<E: Error + 'static> Error for InitError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Construct { source, .. } => Some(source),
            _ => None,
        }
    }
}
