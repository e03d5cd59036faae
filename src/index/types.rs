use serde::{Deserialize, Serialize};

/// Unique identifier for a document in the index
pub type DocId = u32;

/// Zero-based ordinal of a term within its document's term stream
pub type Position = u32;

/// Occurrence record of one term in one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    /// Positions in document order, one entry per occurrence
    pub positions: Vec<Position>,
}

impl Posting {
    pub fn new(doc_id: DocId) -> Self {
        Self {
            doc_id,
            positions: Vec::new(),
        }
    }
}

/// Document entry in the document table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub doc_id: DocId,
    pub title: String,
    pub source: String,
    /// Number of terms in the document, repeats included
    pub length: u32,
}

/// Sanity limits applied while loading an index file.
///
/// Every declared count or length is checked against these before anything
/// is allocated for it, so a corrupted header can never trigger a huge
/// allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadLimits {
    pub max_terms: u64,
    pub max_term_len: u64,
    pub max_postings: u64,
    pub max_positions: u64,
    pub max_docs: u64,
    pub max_title_len: u64,
    pub max_source_len: u64,
}

impl Default for LoadLimits {
    fn default() -> Self {
        Self {
            max_terms: 10_000_000,
            max_term_len: 1_000,
            max_postings: 1_000_000,
            max_positions: 100_000,
            max_docs: 10_000_000,
            max_title_len: 1_000,
            max_source_len: 100,
        }
    }
}

/// Configuration for the index builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Report build progress every N documents (0 disables)
    pub progress_interval: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            progress_interval: 1000,
        }
    }
}
