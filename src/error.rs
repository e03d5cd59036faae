//! Error types for index persistence

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Stream(#[from] io::Error),

    #[error("index file too small ({size} bytes, need at least {min})")]
    TooSmall { size: u64, min: u64 },

    #[error("not an index file (bad magic)")]
    BadMagic,

    #[error("unsupported index version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("{what} out of range ({value} > {limit})")]
    LimitExceeded {
        what: &'static str,
        value: u64,
        limit: u64,
    },

    #[error("{what} is not valid UTF-8")]
    InvalidUtf8 { what: &'static str },

    #[error("unexpected end of index file")]
    Truncated,

    #[error("checksum mismatch (stored {stored:08x}, computed {computed:08x})")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("unexpected data after end of index")]
    TrailingData,
}

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the file was readable but its contents cannot be trusted
    pub fn is_corruption(&self) -> bool {
        !matches!(self, Self::Io { .. } | Self::Stream(_))
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
