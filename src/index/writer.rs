use crate::error::{IndexError, Result};
use crate::index::format::{MAGIC, VERSION};
use crate::index::store::InvertedIndex;
use crc32fast::Hasher;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writer that checksums every byte passing through it
struct ChecksumWriter<W: Write> {
    inner: W,
    hasher: Hasher,
}

impl<W: Write> ChecksumWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Hasher::new(),
        }
    }

    /// Append the checksum footer and hand back the inner writer
    fn finish(mut self) -> io::Result<W> {
        let crc = self.hasher.finalize();
        self.inner.write_all(&crc.to_le_bytes())?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for ChecksumWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn write_len<W: Write>(w: &mut W, len: usize) -> io::Result<()> {
    w.write_all(&(len as u64).to_le_bytes())
}

fn write_str<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    write_len(w, s.len())?;
    w.write_all(s.as_bytes())
}

impl InvertedIndex {
    /// Serialize the whole index into `w`
    pub fn write_to<W: Write>(&self, w: W) -> io::Result<()> {
        let mut file = ChecksumWriter::new(w);

        file.write_all(&MAGIC)?;
        file.write_all(&VERSION.to_le_bytes())?;

        // Term dictionary with inline postings
        write_len(&mut file, self.postings.len())?;
        for (term, postings) in &self.postings {
            write_str(&mut file, term)?;
            write_len(&mut file, postings.len())?;

            for posting in postings {
                file.write_all(&posting.doc_id.to_le_bytes())?;
                write_len(&mut file, posting.positions.len())?;
                for position in &posting.positions {
                    file.write_all(&position.to_le_bytes())?;
                }
            }
        }

        // Document table
        write_len(&mut file, self.documents.len())?;
        for meta in self.documents.values() {
            file.write_all(&meta.doc_id.to_le_bytes())?;
            file.write_all(&meta.length.to_le_bytes())?;
            write_str(&mut file, &meta.title)?;
            write_str(&mut file, &meta.source)?;
        }

        let mut inner = file.finish()?;
        inner.flush()
    }

    /// Save the index to `path`, replacing any existing file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| IndexError::io(path, e))?;
        self.write_to(BufWriter::new(file))
            .map_err(|e| IndexError::io(path, e))?;

        info!(
            path = %path.display(),
            terms = self.term_count(),
            docs = self.doc_count(),
            "index saved"
        );
        Ok(())
    }
}
