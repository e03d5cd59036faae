#![no_main]

use libfuzzer_sys::fuzz_target;
use posidx::index::InvertedIndex;
use posidx::query::{BoolSearch, parse_query};

fuzz_target!(|data: &str| {
    // Parsing and evaluating any string must not panic
    let parsed = parse_query(data);
    assert!(parsed.terms.iter().all(|t| !t.trim().is_empty()));

    let mut index = InvertedIndex::new();
    index.add_document(1, "t", "s", &["a", "b"]);
    let result = BoolSearch::new(&index).execute_query(data);
    assert!(result.doc_ids.windows(2).all(|w| w[0] < w[1]));
});
