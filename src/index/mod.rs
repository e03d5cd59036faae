pub mod build;
pub mod format;
pub mod reader;
pub mod stats;
pub mod store;
pub mod types;
pub mod writer;

pub use build::{BuildReport, build_index, parse_line};
pub use stats::IndexStats;
pub use store::InvertedIndex;
pub use types::*;
