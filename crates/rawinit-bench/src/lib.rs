//! Benchmark fixtures for the rawinit crates.
//!
//! Provides deterministic inputs shared by the criterion benches:
//!
//! - [`Pod`]: a 32-byte trivial element
//! - [`pod_corpus`]: `n` distinct [`Pod`] values
//! - [`string_corpus`]: `n` heap-owning strings of varying length

#![deny(rustdoc::broken_intra_doc_links)]

use rawinit_core::trivial_lifecycle;

/// Plain-old-data element large enough that block copies matter.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pod {
    /// Identifier.
    pub id: u64,
    /// Payload.
    pub coords: [f32; 6],
}

trivial_lifecycle!(Pod);

/// Build `n` distinct [`Pod`] values.
pub fn pod_corpus(n: usize) -> Vec<Pod> {
    (0..n)
        .map(|i| {
            let f = i as f32;
            Pod {
                id: i as u64,
                coords: [f, f + 0.5, f * 2.0, -f, f / 3.0, 1.0],
            }
        })
        .collect()
}

/// Build `n` strings whose lengths cycle through 1..=32 bytes.
pub fn string_corpus(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let len = i % 32 + 1;
            let ch = char::from(b'a' + (i % 26) as u8);
            std::iter::repeat(ch).take(len).collect()
        })
        .collect()
}
