use crate::index::store::InvertedIndex;
use crate::index::types::LoadLimits;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Summary numbers for an index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub unique_terms: usize,
    pub total_postings: usize,
    pub avg_postings_len: f64,
    pub avg_doc_length: f64,
}

impl IndexStats {
    pub fn from_index(index: &InvertedIndex) -> Self {
        let total_postings: usize = index.terms().map(|(_, list)| list.len()).sum();
        let total_length: u64 = index.documents().map(|d| d.length as u64).sum();

        Self {
            documents: index.doc_count(),
            unique_terms: index.term_count(),
            total_postings,
            avg_postings_len: ratio(total_postings as f64, index.term_count()),
            avg_doc_length: ratio(total_length as f64, index.doc_count()),
        }
    }

    /// Display index statistics
    pub fn print(&self) {
        println!();
        println!("Index Statistics");
        println!("================");
        println!("Documents:         {}", self.documents);
        println!("Unique terms:      {}", self.unique_terms);
        println!("Total postings:    {}", self.total_postings);
        println!("Avg postings list: {:.2}", self.avg_postings_len);
        println!("Avg doc length:    {:.2}", self.avg_doc_length);
        println!();
    }
}

/// Load an index file and display its statistics
pub fn show_stats(index_path: &Path, limits: &LoadLimits, json: bool) -> Result<()> {
    let index = InvertedIndex::open(index_path, limits)
        .with_context(|| format!("Failed to load index {}", index_path.display()))?;
    let stats = IndexStats::from_index(&index);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Index file:        {}", index_path.display());
        stats.print();
    }
    Ok(())
}

fn ratio(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}
