use crate::index::types::*;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tracing::warn;

/// In-memory positional inverted index.
///
/// Owns both the term -> postings mapping and the document table. Both are
/// ordered maps, so iteration (and therefore the saved file) is sorted by
/// term bytes and by doc_id respectively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    pub(crate) postings: BTreeMap<String, Vec<Posting>>,
    pub(crate) documents: BTreeMap<DocId, DocumentMeta>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document and its term stream to the index.
    ///
    /// Metadata for `doc_id` is overwritten if it already exists, but postings
    /// are append-only: adding the same doc_id twice leaves two postings for
    /// that doc_id under every term it contains.
    pub fn add_document<S: AsRef<str>>(
        &mut self,
        doc_id: DocId,
        title: &str,
        source: &str,
        terms: &[S],
    ) {
        // Positions and lengths are u32 in the file format
        let Ok(length) = u32::try_from(terms.len()) else {
            warn!(doc_id, terms = terms.len(), "document too long, not indexed");
            return;
        };

        let meta = DocumentMeta {
            doc_id,
            title: title.to_string(),
            source: source.to_string(),
            length,
        };
        if self.documents.insert(doc_id, meta).is_some() {
            warn!(doc_id, "document added twice, postings will be duplicated");
        }

        // One posting per distinct term of this call, positions in stream order
        let mut opened: FxHashMap<&str, Posting> = FxHashMap::default();
        for (position, term) in (0..length).zip(terms) {
            opened
                .entry(term.as_ref())
                .or_insert_with(|| Posting::new(doc_id))
                .positions
                .push(position);
        }

        for (term, posting) in opened {
            match self.postings.get_mut(term) {
                Some(list) => list.push(posting),
                None => {
                    self.postings.insert(term.to_string(), vec![posting]);
                }
            }
        }
    }

    /// Move everything from `other` into `self`, as if its documents had been
    /// added here in the same order.
    pub(crate) fn append(&mut self, other: InvertedIndex) {
        if self.is_empty() {
            *self = other;
            return;
        }

        for (doc_id, meta) in other.documents {
            if self.documents.insert(doc_id, meta).is_some() {
                warn!(doc_id, "document added twice, postings will be duplicated");
            }
        }
        for (term, mut list) in other.postings {
            self.postings.entry(term).or_default().append(&mut list);
        }
    }

    /// Doc ids containing `term`, in postings order. Empty if unknown.
    pub fn get_postings(&self, term: &str) -> Vec<DocId> {
        self.postings
            .get(term)
            .map(|list| list.iter().map(|p| p.doc_id).collect())
            .unwrap_or_default()
    }

    /// Full postings (with positions) for `term`, or `None` if it was never indexed
    pub fn get_postings_with_positions(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn get_document_meta(&self, doc_id: DocId) -> Option<&DocumentMeta> {
        self.documents.get(&doc_id)
    }

    /// Number of unique terms
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Number of documents in the document table
    pub fn doc_count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty() && self.documents.is_empty()
    }

    pub fn clear(&mut self) {
        self.postings.clear();
        self.documents.clear();
    }

    /// Iterate terms with their postings in ascending term order
    pub fn terms(&self) -> impl Iterator<Item = (&str, &[Posting])> {
        self.postings
            .iter()
            .map(|(term, list)| (term.as_str(), list.as_slice()))
    }

    /// Iterate document metadata in ascending doc_id order
    pub fn documents(&self) -> impl Iterator<Item = &DocumentMeta> {
        self.documents.values()
    }
}
