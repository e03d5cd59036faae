//! Utility functions and data structures.
//!
//! - [`progress`] - Progress bar that becomes a no-op without the `progress` feature

pub mod progress;
