//! On-disk layout of a saved index.
//!
//! ```text
//! file     := MAGIC, VERSION:u32, body, crc32:u32
//! body     := terms_count:u64, term_entry*, docs_count:u64, doc_entry*
//! term     := term_len:u64, bytes, postings_count:u64, posting*
//! posting  := doc_id:u32, positions_count:u64, position:u32*
//! doc      := doc_id:u32, length:u32, title_len:u64, bytes, source_len:u64, bytes
//! ```
//!
//! All integers are little-endian. The checksum covers everything before it.

pub const MAGIC: [u8; 4] = *b"PIDX";

pub const VERSION: u32 = 1;

/// Size of an index with no terms and no documents
pub const MIN_FILE_SIZE: u64 = 4 + 4 + 8 + 8 + 4;
