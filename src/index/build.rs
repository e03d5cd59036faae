use crate::error::{IndexError, Result};
use crate::index::stats::IndexStats;
use crate::index::store::InvertedIndex;
use crate::index::types::{DocId, IndexConfig};
use crate::utils::progress;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One parsed line of the stemmed token stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLine<'a> {
    pub doc_id: DocId,
    pub source: &'a str,
    pub title: &'a str,
    pub terms: Vec<&'a str>,
}

/// Parse `doc_id|source|title|term term ...`.
///
/// Empty fields are dropped before counting, so a line needs four non-empty
/// fields. Anything after the fourth field is ignored. Returns `None` for
/// malformed lines.
pub fn parse_line(line: &str) -> Option<TokenLine<'_>> {
    let mut fields = line.split('|').filter(|f| !f.is_empty());

    let doc_id = fields.next()?;
    let source = fields.next()?;
    let title = fields.next()?;
    let terms = fields.next()?;

    let doc_id = doc_id.trim().parse::<DocId>().ok()?;
    let terms = terms.split(' ').filter(|t| !t.is_empty()).collect();

    Some(TokenLine {
        doc_id,
        source,
        title,
        terms,
    })
}

/// Outcome of a build pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub docs_added: usize,
    pub lines_skipped: usize,
}

impl InvertedIndex {
    /// Add every well-formed line of `reader` to the index.
    ///
    /// Malformed lines are skipped; only a failing reader aborts the build,
    /// in which case `self` is left as it was.
    pub fn build_from_stream<R: BufRead>(
        &mut self,
        reader: R,
        config: &IndexConfig,
    ) -> Result<BuildReport> {
        let mut staged = InvertedIndex::new();
        let mut report = BuildReport::default();

        let spinner = progress::spinner("Building index...");

        for (line_no, raw) in reader.split(b'\n').enumerate() {
            let raw = raw?;
            let line = String::from_utf8_lossy(&raw);
            let line = line.strip_suffix('\r').unwrap_or(&line);

            let Some(parsed) = parse_line(line) else {
                if !line.is_empty() {
                    debug!(line = line_no + 1, "skipping malformed line");
                }
                report.lines_skipped += 1;
                continue;
            };

            staged.add_document(
                parsed.doc_id,
                parsed.title,
                parsed.source,
                parsed.terms.as_slice(),
            );
            report.docs_added += 1;

            if config.progress_interval > 0 && report.docs_added % config.progress_interval == 0 {
                spinner.set_message(format!("Processed: {}", report.docs_added));
            }
        }

        spinner.finish_and_clear();

        if report.lines_skipped > 0 {
            warn!("Skipped {} malformed lines", report.lines_skipped);
        }
        self.append(staged);
        Ok(report)
    }

    /// Build from a token file on disk
    pub fn build_from_file(&mut self, path: &Path, config: &IndexConfig) -> Result<BuildReport> {
        let file = File::open(path).map_err(|e| IndexError::io(path, e))?;
        self.build_from_stream(BufReader::new(file), config)
    }
}

/// Build an index from `input`, print its statistics and save it to `output`
pub fn build_index(input: &Path, output: &Path, config: &IndexConfig) -> Result<BuildReport> {
    let mut index = InvertedIndex::new();
    let start = Instant::now();

    println!("Building index from: {}", input.display());
    let report = index.build_from_file(input, config)?;
    println!("Index built: {} documents", report.docs_added);
    info!(
        docs = report.docs_added,
        skipped = report.lines_skipped,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "build finished"
    );

    IndexStats::from_index(&index).print();

    index.save_to_file(output)?;
    println!("Index saved: {}", output.display());

    Ok(report)
}
