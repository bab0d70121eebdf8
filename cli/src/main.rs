//! Thin command-line wrapper around `doc_listing::Index`.
//!
//! Not part of the core library: building the underlying suffix array and
//! reading the query patterns are this binary's only two responsibilities.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use doc_listing::{Config, Index};

/// Query a compressed document-listing index for one or more patterns.
#[derive(Parser, Debug)]
#[command(name = "doc-listing")]
#[command(about = "Query a compressed document-listing index")]
struct Args {
    /// Basename of the collection; `<basename>.txt` holds the raw,
    /// delimiter-separated text the index is built over.
    #[arg(long, value_name = "BASENAME")]
    data: PathBuf,

    /// Path to a file of newline-separated patterns to query.
    #[arg(long, value_name = "FILE")]
    patterns: PathBuf,

    /// Turn on verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,

    /// Document delimiter byte, as a single ASCII character.
    #[arg(long, default_value = "$")]
    delim: char,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let env_filter =
        EnvFilter::builder().with_default_directive(level.into()).with_env_var("DOC_LISTING_LOG").from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).compact().init();
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(1);
        }
    };

    init_tracing(args.verbose);

    let index = match load_index(&args) {
        Ok(index) => index,
        Err(e) => {
            error!("failed to build the index from {:?}: {e}", args.data);
            return ExitCode::from(2);
        }
    };

    let patterns = match fs::read_to_string(&args.patterns) {
        Ok(contents) => contents,
        Err(e) => {
            error!("failed to read patterns file {:?}: {e}", args.patterns);
            return ExitCode::from(3);
        }
    };

    for line in patterns.lines() {
        if line.is_empty() {
            continue;
        }
        let docs = index.list(line.as_bytes());
        debug!("pattern {line:?} matched {} document(s)", docs.len());
        let rendered: Vec<String> = docs.iter().map(|d| d.to_string()).collect();
        println!("{line}\t{}", rendered.join(","));
    }

    ExitCode::SUCCESS
}

fn load_index(args: &Args) -> Result<Index, Box<dyn std::error::Error>> {
    let text_path = args.data.with_extension("txt");
    info!("reading collection text from {text_path:?}");
    let text = fs::read(&text_path)?;

    let mut delim_buf = [0u8; 4];
    let delim_str = args.delim.encode_utf8(&mut delim_buf);
    if delim_str.len() != 1 {
        return Err("--delim must be a single ASCII byte".into());
    }

    let config = Config { delim: delim_str.as_bytes()[0], ..Config::default() };
    let index = Index::build(text, config)?;
    info!("built index over {} document(s)", index.doc_count());
    Ok(index)
}
