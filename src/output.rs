//! Output formatting for search results

use crate::index::store::InvertedIndex;
use crate::query::SearchResult;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Write the result summary followed by the first `top_k` documents as
/// `rank. [source] title`.
///
/// Ranks follow result order; doc ids without metadata are skipped but still
/// use up their rank.
pub fn write_result<W: WriteColor>(
    out: &mut W,
    index: &InvertedIndex,
    query: Option<&str>,
    result: &SearchResult,
    top_k: usize,
) -> io::Result<()> {
    if let Some(query) = query {
        writeln!(out)?;
        write!(out, "Query: ")?;
        out.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(out, "{}", query)?;
        out.reset()?;
    }

    write!(out, "Found: ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    writeln!(out, "{}", result.total_found)?;
    out.reset()?;
    writeln!(out, "Time: {:.3} ms", result.elapsed_ms())?;

    let limit = top_k.min(result.doc_ids.len());
    if limit == 0 {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Top-{}:", limit)?;
    for (rank, doc_id) in result.doc_ids.iter().take(limit).enumerate() {
        let Some(meta) = index.get_document_meta(*doc_id) else {
            continue;
        };

        write!(out, "{}. ", rank + 1)?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "[{}]", meta.source)?;
        out.reset()?;
        writeln!(out, " {}", meta.title)?;
    }

    Ok(())
}

/// Print a search result to stdout
pub fn print_result(
    index: &InvertedIndex,
    query: Option<&str>,
    result: &SearchResult,
    top_k: usize,
    color: bool,
) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    write_result(&mut stdout, index, query, result, top_k)?;
    stdout.flush()
}
