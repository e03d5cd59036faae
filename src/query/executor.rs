use crate::index::store::InvertedIndex;
use crate::index::types::DocId;
use crate::query::parser::{BoolOperator, ParsedQuery, parse_query};
use roaring::RoaringBitmap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of a boolean search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub doc_ids: Vec<DocId>,
    pub total_found: usize,
    pub elapsed: Duration,
}

impl SearchResult {
    fn new(doc_ids: Vec<DocId>, start: Instant) -> Self {
        Self {
            total_found: doc_ids.len(),
            doc_ids,
            elapsed: start.elapsed(),
        }
    }

    /// Elapsed time in fractional milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Boolean query engine over a borrowed index.
///
/// Operators are applied strictly left to right with no precedence:
/// `a OR b AND c` is `(a OR b) AND c`.
pub struct BoolSearch<'a> {
    index: &'a InvertedIndex,
}

impl<'a> BoolSearch<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self { index }
    }

    /// Look up a single term; doc ids come back in postings order
    pub fn search_term(&self, term: &str) -> SearchResult {
        let start = Instant::now();
        SearchResult::new(self.index.get_postings(term), start)
    }

    /// Evaluate `terms` joined by `operators`.
    ///
    /// Extra operators or terms beyond the shorter sequence are ignored. The
    /// result is ascending and duplicate free.
    pub fn search_query<S: AsRef<str>>(
        &self,
        terms: &[S],
        operators: &[BoolOperator],
    ) -> SearchResult {
        let Some((first, rest)) = terms.split_first() else {
            return SearchResult::default();
        };

        let start = Instant::now();
        let mut result = self.term_set(first.as_ref());

        for (op, term) in operators.iter().zip(rest) {
            let next = self.term_set(term.as_ref());
            match op {
                BoolOperator::And => result &= next,
                BoolOperator::Or => result |= next,
                BoolOperator::Not => result -= next,
            }
        }

        SearchResult::new(result.iter().collect(), start)
    }

    /// Evaluate an already parsed query
    pub fn search_parsed(&self, query: &ParsedQuery) -> SearchResult {
        self.search_query(query.terms.as_slice(), &query.operators)
    }

    /// Parse and evaluate a query string
    pub fn execute_query(&self, query: &str) -> SearchResult {
        let parsed = parse_query(query);
        let result = self.search_parsed(&parsed);
        debug!(
            query,
            evaluated = %parsed,
            found = result.total_found,
            "query executed"
        );
        result
    }

    fn term_set(&self, term: &str) -> RoaringBitmap {
        self.index
            .get_postings_with_positions(term)
            .map(|list| list.iter().map(|p| p.doc_id).collect())
            .unwrap_or_default()
    }
}
