#![no_main]

use libfuzzer_sys::fuzz_target;
use posidx::index::{InvertedIndex, LoadLimits};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must be rejected or decoded, never panic or
    // allocate past the configured limits
    let limits = LoadLimits {
        max_terms: 1_000,
        max_postings: 1_000,
        max_positions: 1_000,
        max_docs: 1_000,
        ..LoadLimits::default()
    };
    let _ = InvertedIndex::read_from(data, &limits);
});
