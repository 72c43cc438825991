//! Scratch buffer configuration parameters.

use std::mem;

/// Configuration for temporary buffer acquisition.
///
/// All values are plain data; a config can be shared by any number of
/// buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScratchConfig {
    /// Largest single request, in bytes.
    ///
    /// Requests for more elements than fit are clamped before the first
    /// allocation attempt, so the byte size computation cannot overflow.
    /// Default: `i32::MAX` bytes. Values above `isize::MAX` are treated as
    /// `isize::MAX`.
    pub max_request_bytes: usize,
}

impl ScratchConfig {
    /// Default request ceiling: `i32::MAX` bytes (just under 2 GiB).
    pub const DEFAULT_MAX_REQUEST_BYTES: usize = i32::MAX as usize;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            max_request_bytes: Self::DEFAULT_MAX_REQUEST_BYTES,
        }
    }

    /// Replace the request ceiling.
    pub fn with_max_request_bytes(mut self, bytes: usize) -> Self {
        self.max_request_bytes = bytes;
        self
    }

    /// Maximum number of `T` elements a single request may ask for.
    ///
    /// Zero-sized types are never limited.
    pub fn max_elements<T>(&self) -> usize {
        let size = mem::size_of::<T>();
        if size == 0 {
            return usize::MAX;
        }
        self.max_request_bytes.min(isize::MAX as usize) / size
    }
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self::new()
    }
}
