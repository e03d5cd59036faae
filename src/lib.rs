//! # posidx - Positional Inverted Index with Boolean Search
//!
//! posidx builds a positional inverted index from a stream of pre-stemmed
//! documents, persists it to a compact checksummed binary file, reloads it
//! defensively, and answers boolean `AND` / `OR` / `NOT` queries.
//!
//! ## Architecture
//!
//! - [`index`] - Index store, builder, binary writer and defensive reader
//! - [`query`] - Query tokenizer and left-to-right boolean evaluation
//! - [`output`] - Result formatting
//! - [`config`] - JSON configuration (load limits, search and build settings)
//! - [`error`] - Typed errors for index persistence
//!
//! ## Quick Start
//!
//! ```no_run
//! use posidx::index::{InvertedIndex, LoadLimits};
//! use posidx::query::BoolSearch;
//! use std::path::Path;
//!
//! let index = InvertedIndex::open(Path::new("index.bin"), &LoadLimits::default()).unwrap();
//! let search = BoolSearch::new(&index);
//! let result = search.execute_query("toyota AND corolla");
//!
//! for doc_id in &result.doc_ids {
//!     if let Some(meta) = index.get_document_meta(*doc_id) {
//!         println!("[{}] {}", meta.source, meta.title);
//!     }
//! }
//! ```
//!
//! ## Input format
//!
//! One document per line, `doc_id|source|title|term term ...`, with terms
//! already lowercased and stemmed. Lines with fewer than four fields are
//! skipped.

pub mod config;
pub mod error;
pub mod index;
pub mod output;
pub mod query;
pub mod utils;

pub use error::IndexError;
