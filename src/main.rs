use anyhow::Result;
use clap::{Parser, Subcommand};
use posidx::config::Config;
use posidx::index::{IndexStats, InvertedIndex, build_index, stats};
use posidx::output::print_result;
use posidx::query::BoolSearch;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "posidx")]
#[command(about = "Positional inverted index with boolean search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index from a stemmed token file
    Index {
        /// Input file with `doc_id|source|title|terms` lines
        input: PathBuf,

        /// Output index file
        output: PathBuf,
    },
    /// Search an index (interactive when no query is given)
    Search {
        /// Index file
        index: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Query, e.g. `bmw AND x5`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },
    /// Show index statistics
    Stats {
        /// Index file
        index: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("posidx=info")),
        )
        .with_writer(io::stderr)
        .init();

    // Usage errors exit with 1; --help and --version are not errors
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Index { input, output } => {
            // File errors are reported, not turned into a failing exit code
            if let Err(e) = build_index(&input, &output, &config.build) {
                error!("Index build failed: {}", e);
            }
        }
        Commands::Search {
            index,
            no_color,
            query,
        } => {
            run_search(&index, query, &config, !no_color)?;
        }
        Commands::Stats { index, json } => {
            stats::show_stats(&index, &config.limits, json)?;
        }
    }

    Ok(())
}

fn run_search(index_path: &Path, query: Vec<String>, config: &Config, color: bool) -> Result<()> {
    // A failed load is reported and searching continues over an empty index
    let mut index = InvertedIndex::new();
    println!("Loading index...");
    let _ = index.load_from_file(index_path, &config.limits);
    IndexStats::from_index(&index).print();

    let search = BoolSearch::new(&index);
    let top_k = config.search.top_k;

    if !query.is_empty() {
        let query = query.join(" ");
        let result = search.execute_query(&query);
        print_result(&index, Some(query.as_str()), &result, top_k, color)?;
        return Ok(());
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();

    if interactive {
        println!("BOOLEAN SEARCH (interactive mode)");
        println!("Enter a query, or 'exit' to quit");
        println!("Examples: toyota, bmw AND x5, audi OR mercedes, toyota NOT camry");
        println!("==============================");
        println!();
        prompt()?;
    }

    let mut processed = 0usize;
    for line in stdin.lock().lines() {
        let line = line?;
        // Piped input stops on an empty line; whitespace is still a query
        if line.is_empty() && !interactive {
            break;
        }
        let query = line.trim();

        if query.is_empty() && interactive {
            prompt()?;
            continue;
        }
        if query == "exit" || query == "quit" {
            break;
        }

        let result = search.execute_query(query);
        print_result(&index, interactive.then_some(query), &result, top_k, color)?;
        processed += 1;

        // Piped input answers exactly one query
        if !interactive {
            break;
        }
        println!();
        prompt()?;
    }

    if interactive {
        println!();
        println!("Goodbye! Queries processed: {}", processed);
    }
    Ok(())
}

fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}
