use crate::error::{IndexError, Result};
use crate::index::format::{MAGIC, MIN_FILE_SIZE, VERSION};
use crate::index::store::InvertedIndex;
use crate::index::types::*;
use crc32fast::Hasher;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};

/// Upper bound on speculative preallocation, independent of declared counts
const PREALLOC_CAP: usize = 4096;

/// Reader that checksums every byte it hands out
struct ChecksumReader<R: Read> {
    inner: R,
    hasher: Hasher,
}

impl<R: Read> Read for ChecksumReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

/// Bounds-checked decoder over an index stream
struct Decoder<'a, R: Read> {
    file: ChecksumReader<R>,
    limits: &'a LoadLimits,
}

impl<'a, R: Read> Decoder<'a, R> {
    fn new(inner: R, limits: &'a LoadLimits) -> Self {
        Self {
            file: ChecksumReader {
                inner,
                hasher: Hasher::new(),
            },
            limits,
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.file.read_exact(buf).map_err(eof_as_truncated)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf4 = [0u8; 4];
        self.read_exact(&mut buf4)?;
        Ok(u32::from_le_bytes(buf4))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let mut buf8 = [0u8; 8];
        self.read_exact(&mut buf8)?;
        Ok(u64::from_le_bytes(buf8))
    }

    /// Read a count or length and reject it before anything is sized from it
    fn read_len(&mut self, what: &'static str, limit: u64) -> Result<usize> {
        let value = self.read_u64()?;
        if value > limit {
            return Err(IndexError::LimitExceeded { what, value, limit });
        }
        Ok(value as usize)
    }

    fn read_string(&mut self, what: &'static str, limit: u64) -> Result<String> {
        let len = self.read_len(what, limit)?;
        let mut bytes = vec![0u8; len];
        self.read_exact(&mut bytes)?;
        String::from_utf8(bytes).map_err(|_| IndexError::InvalidUtf8 { what })
    }

    fn read_header(&mut self) -> Result<()> {
        let mut magic = [0u8; 4];
        self.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(IndexError::BadMagic);
        }

        let version = self.read_u32()?;
        if version != VERSION {
            return Err(IndexError::UnsupportedVersion {
                found: version,
                expected: VERSION,
            });
        }
        Ok(())
    }

    fn read_posting(&mut self) -> Result<Posting> {
        let doc_id = self.read_u32()?;
        let count = self.read_len("positions count", self.limits.max_positions)?;

        let mut posting = Posting {
            doc_id,
            positions: Vec::with_capacity(count.min(PREALLOC_CAP)),
        };
        for _ in 0..count {
            posting.positions.push(self.read_u32()?);
        }
        Ok(posting)
    }

    fn read_document(&mut self) -> Result<DocumentMeta> {
        let doc_id = self.read_u32()?;
        let length = self.read_u32()?;
        let title = self.read_string("title length", self.limits.max_title_len)?;
        let source = self.read_string("source length", self.limits.max_source_len)?;

        Ok(DocumentMeta {
            doc_id,
            title,
            source,
            length,
        })
    }

    fn decode(mut self) -> Result<InvertedIndex> {
        let mut index = InvertedIndex::new();

        self.read_header()?;

        let terms_count = self.read_len("terms count", self.limits.max_terms)?;
        debug!(terms_count, "loading terms");
        for _ in 0..terms_count {
            let term = self.read_string("term length", self.limits.max_term_len)?;
            let count = self.read_len("postings count", self.limits.max_postings)?;

            let mut postings = Vec::with_capacity(count.min(PREALLOC_CAP));
            for _ in 0..count {
                postings.push(self.read_posting()?);
            }
            index.postings.insert(term, postings);
        }

        let docs_count = self.read_len("docs count", self.limits.max_docs)?;
        debug!(docs_count, "loading document metadata");
        for _ in 0..docs_count {
            let meta = self.read_document()?;
            index.documents.insert(meta.doc_id, meta);
        }

        // Footer is not part of its own checksum
        let computed = self.file.hasher.clone().finalize();
        let mut buf4 = [0u8; 4];
        self.file.inner.read_exact(&mut buf4).map_err(eof_as_truncated)?;
        let stored = u32::from_le_bytes(buf4);
        if stored != computed {
            return Err(IndexError::ChecksumMismatch { stored, computed });
        }

        let mut extra = [0u8; 1];
        if self.file.inner.read(&mut extra)? != 0 {
            return Err(IndexError::TrailingData);
        }

        Ok(index)
    }
}

fn eof_as_truncated(e: io::Error) -> IndexError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        IndexError::Truncated
    } else {
        IndexError::Stream(e)
    }
}

impl InvertedIndex {
    /// Decode an index from `r`, enforcing `limits` on every declared size
    pub fn read_from<R: Read>(r: R, limits: &LoadLimits) -> Result<Self> {
        Decoder::new(r, limits).decode()
    }

    /// Open and decode an index file
    pub fn open(path: &Path, limits: &LoadLimits) -> Result<Self> {
        let file = File::open(path).map_err(|e| IndexError::io(path, e))?;
        let size = file
            .metadata()
            .map_err(|e| IndexError::io(path, e))?
            .len();

        if size < MIN_FILE_SIZE {
            return Err(IndexError::TooSmall {
                size,
                min: MIN_FILE_SIZE,
            });
        }

        info!(path = %path.display(), bytes = size, "loading index");
        let start = Instant::now();
        let index = Self::read_from(BufReader::new(file), limits)?;
        info!(
            terms = index.term_count(),
            docs = index.doc_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "index loaded"
        );
        Ok(index)
    }

    /// Replace the contents of this index with the file at `path`.
    ///
    /// On any failure the index is left exactly as it was.
    pub fn load_from_file(&mut self, path: &Path, limits: &LoadLimits) -> Result<()> {
        match Self::open(path, limits) {
            Ok(loaded) => {
                *self = loaded;
                Ok(())
            }
            Err(e) => {
                if e.is_corruption() {
                    error!("index {} is corrupt: {}; rebuild it", path.display(), e);
                } else {
                    error!("failed to load index {}: {}", path.display(), e);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        index.add_document(1, "Toyota Corolla review", "autonews", &["toyota", "corolla", "toyota"]);
        index.add_document(2, "Camry", "drive", &["toyota", "camry"]);
        index.add_document(4, "Пробег", "авто", &["пробег", "toyota"]);
        index
    }

    fn encode(index: &InvertedIndex) -> Vec<u8> {
        let mut buf = Vec::new();
        index.write_to(&mut buf).unwrap();
        buf
    }

    /// Patch a little-endian u64 and re-seal the checksum
    fn patch_u64(buf: &mut Vec<u8>, offset: usize, value: u64) {
        buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
        let body = buf.len() - 4;
        let crc = crc32fast::hash(&buf[..body]);
        buf[body..].copy_from_slice(&crc.to_le_bytes());
    }

    #[test]
    fn test_round_trip() {
        let index = sample_index();
        let loaded = InvertedIndex::read_from(&encode(&index)[..], &LoadLimits::default()).unwrap();

        assert_eq!(loaded, index);
        assert_eq!(
            loaded.get_postings_with_positions("toyota").unwrap()[0].positions,
            vec![0, 2]
        );
        assert_eq!(loaded.get_document_meta(4).unwrap().source, "авто");
    }

    #[test]
    fn test_round_trip_empty() {
        let loaded =
            InvertedIndex::read_from(&encode(&InvertedIndex::new())[..], &LoadLimits::default())
                .unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_reject_huge_term_len() {
        let mut index = InvertedIndex::new();
        index.add_document(1, "t", "s", &["abc"]);
        let mut buf = encode(&index);
        // magic + version + terms_count, then term_len
        patch_u64(&mut buf, 16, 50_000);

        let err = InvertedIndex::read_from(&buf[..], &LoadLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            IndexError::LimitExceeded { what: "term length", value: 50_000, .. }
        ));
    }

    #[test]
    fn test_reject_huge_terms_count() {
        let mut buf = encode(&sample_index());
        patch_u64(&mut buf, 8, u64::MAX);

        let err = InvertedIndex::read_from(&buf[..], &LoadLimits::default()).unwrap_err();
        assert!(matches!(err, IndexError::LimitExceeded { what: "terms count", .. }));
    }

    #[test]
    fn test_reject_huge_positions_count() {
        let mut index = InvertedIndex::new();
        index.add_document(1, "t", "s", &["ab"]);
        let mut buf = encode(&index);
        // header(8) terms_count(8) term_len(8) "ab"(2) postings_count(8) doc_id(4)
        patch_u64(&mut buf, 38, 100_001);

        let err = InvertedIndex::read_from(&buf[..], &LoadLimits::default()).unwrap_err();
        assert!(matches!(err, IndexError::LimitExceeded { what: "positions count", .. }));
    }

    #[test]
    fn test_reject_huge_postings_count() {
        let mut index = InvertedIndex::new();
        index.add_document(1, "t", "s", &["ab"]);
        let mut buf = encode(&index);
        // header(8) terms_count(8) term_len(8) "ab"(2)
        patch_u64(&mut buf, 26, 1_000_001);

        let err = InvertedIndex::read_from(&buf[..], &LoadLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            IndexError::LimitExceeded { what: "postings count", value: 1_000_001, .. }
        ));
    }

    #[test]
    fn test_reject_huge_docs_count() {
        let mut index = InvertedIndex::new();
        index.add_document::<&str>(1, "t", "s", &[]);
        let mut buf = encode(&index);
        // header(8) terms_count(8), then docs_count
        patch_u64(&mut buf, 16, 10_000_001);

        let err = InvertedIndex::read_from(&buf[..], &LoadLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            IndexError::LimitExceeded { what: "docs count", value: 10_000_001, .. }
        ));
    }

    #[test]
    fn test_reject_long_title() {
        let mut index = InvertedIndex::new();
        index.add_document(1, &"t".repeat(1_001), "s", &["ab"]);
        let buf = encode(&index);

        let err = InvertedIndex::read_from(&buf[..], &LoadLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            IndexError::LimitExceeded { what: "title length", value: 1_001, .. }
        ));
    }

    #[test]
    fn test_reject_long_source() {
        let mut index = InvertedIndex::new();
        index.add_document(1, "t", &"s".repeat(101), &["ab"]);
        let buf = encode(&index);

        let err = InvertedIndex::read_from(&buf[..], &LoadLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            IndexError::LimitExceeded { what: "source length", value: 101, .. }
        ));
    }

    #[test]
    fn test_exact_limits_accepted() {
        let term = "k".repeat(1_000);
        let mut index = InvertedIndex::new();
        index.add_document(1, &"t".repeat(1_000), &"s".repeat(100), &[term.as_str()]);

        let loaded = InvertedIndex::read_from(&encode(&index)[..], &LoadLimits::default()).unwrap();
        assert_eq!(loaded, index);
        assert_eq!(loaded.get_postings(&term), vec![1]);

        // Every count equal to its limit
        let limits = LoadLimits {
            max_terms: 1,
            max_postings: 1,
            max_positions: 1,
            max_docs: 1,
            max_term_len: 1_000,
            max_title_len: 1_000,
            max_source_len: 100,
        };
        assert_eq!(InvertedIndex::read_from(&encode(&index)[..], &limits).unwrap(), index);
    }

    #[test]
    fn test_custom_limits() {
        let mut index = InvertedIndex::new();
        index.add_document(1, "t", "a-rather-long-source-name", &["ab"]);
        let buf = encode(&index);

        let limits = LoadLimits {
            max_source_len: 8,
            ..LoadLimits::default()
        };
        let err = InvertedIndex::read_from(&buf[..], &limits).unwrap_err();
        assert!(matches!(err, IndexError::LimitExceeded { what: "source length", .. }));
    }

    #[test]
    fn test_truncated() {
        let buf = encode(&sample_index());
        for cut in [8, 20, buf.len() / 2, buf.len() - 1] {
            let err = InvertedIndex::read_from(&buf[..cut], &LoadLimits::default()).unwrap_err();
            assert!(matches!(err, IndexError::Truncated), "cut at {cut}: {err}");
        }
    }

    #[test]
    fn test_bit_flip_detected() {
        let mut buf = encode(&sample_index());
        // flip a byte inside the first term's text
        buf[24] ^= 0x01;

        let err = InvertedIndex::read_from(&buf[..], &LoadLimits::default()).unwrap_err();
        assert!(matches!(err, IndexError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_bad_magic_and_version() {
        let mut buf = encode(&sample_index());
        buf[0] = b'X';
        let err = InvertedIndex::read_from(&buf[..], &LoadLimits::default()).unwrap_err();
        assert!(matches!(err, IndexError::BadMagic));

        let mut buf = encode(&sample_index());
        buf[4..8].copy_from_slice(&7u32.to_le_bytes());
        let err = InvertedIndex::read_from(&buf[..], &LoadLimits::default()).unwrap_err();
        assert!(matches!(err, IndexError::UnsupportedVersion { found: 7, expected: 1 }));
    }

    #[test]
    fn test_trailing_data() {
        let mut buf = encode(&sample_index());
        buf.push(0);
        let err = InvertedIndex::read_from(&buf[..], &LoadLimits::default()).unwrap_err();
        assert!(matches!(err, IndexError::TrailingData));
    }

    #[test]
    fn test_failed_load_leaves_index_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");

        let mut buf = encode(&sample_index());
        patch_u64(&mut buf, 16, 50_000);
        std::fs::write(&path, &buf).unwrap();

        let mut fresh = InvertedIndex::new();
        assert!(fresh.load_from_file(&path, &LoadLimits::default()).is_err());
        assert!(fresh.is_empty());

        let mut existing = sample_index();
        assert!(existing.load_from_file(&path, &LoadLimits::default()).is_err());
        assert_eq!(existing, sample_index());
    }

    #[test]
    fn test_too_small_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.bin");
        std::fs::write(&path, b"PIDX").unwrap();

        let err = InvertedIndex::open(&path, &LoadLimits::default()).unwrap_err();
        assert!(matches!(err, IndexError::TooSmall { size: 4, .. }));
        assert!(err.is_corruption());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = InvertedIndex::open(&dir.path().join("nope.bin"), &LoadLimits::default())
            .unwrap_err();
        assert!(matches!(err, IndexError::Io { .. }));
    }

    #[test]
    fn test_load_from_file_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        sample_index().save_to_file(&path).unwrap();

        let mut index = InvertedIndex::new();
        index.add_document(99, "stale", "s", &["old"]);
        index.load_from_file(&path, &LoadLimits::default()).unwrap();

        assert_eq!(index, sample_index());
        assert!(index.get_document_meta(99).is_none());
    }
}
