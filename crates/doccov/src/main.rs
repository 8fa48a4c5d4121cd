//! Command-line front end for `libdoccov`.

use std::{
    error::Error,
    io::{self, Write},
    path::PathBuf,
    process,
};

use clap::Parser;
use libdoccov::{DocCoverage, PackageResolver, RustdocLoader, SearchPathResolver};
use regex::Regex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments.
struct Cli {
    /// Module to rate: a package directory, source file or package name,
    /// followed by an optional `::module::path`
    target: String,

    /// Replace the default private-name patterns (repeatable)
    #[arg(long, value_name = "REGEX")]
    private: Option<Vec<Regex>>,

    /// Add a private-name pattern to the active set (repeatable)
    #[arg(long, value_name = "REGEX")]
    also_private: Vec<Regex>,

    /// Count routines matching this pattern as documented (repeatable)
    #[arg(long, value_name = "REGEX")]
    trustme: Vec<Regex>,

    /// Read documentation from this file instead of searching for it
    #[arg(long, value_name = "PATH", env = "DOCCOV_DOC_FROM")]
    doc_from: Option<PathBuf>,

    /// Directories searched, in order, for documentation of bare module names
    #[arg(long, value_name = "DIR", value_delimiter = ',', env = "DOCCOV_SEARCH_PATH")]
    search_path: Vec<PathBuf>,

    /// Read rustdoc JSON from this file instead of generating it
    #[arg(long, value_name = "PATH")]
    json_file: Option<PathBuf>,

    /// Show cargo output while generating rustdoc JSON
    #[arg(long, default_value_t = false)]
    verbose: bool,

    /// Log progress diagnostics to stderr
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Installs the stderr log subscriber; `--debug` raises the library to debug level.
fn init_tracing(debug: bool) {
    let mut filter = EnvFilter::from_default_env();
    if debug {
        if let Ok(directive) = "libdoccov=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs one analysis and prints the result.
fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let loader = match cli.json_file {
        Some(path) => RustdocLoader::from_json(path),
        None => RustdocLoader::new(),
    }
    .with_silent(!cli.verbose);

    let mut analysis = DocCoverage::new(cli.target)
        .with_loader(loader)
        .with_also_private(cli.also_private)
        .with_trustme(cli.trustme)
        .with_debug(cli.debug);
    if let Some(private) = cli.private {
        analysis = analysis.with_private(private);
    }
    if let Some(doc_from) = cli.doc_from {
        analysis = analysis.with_doc_from(doc_from);
    }
    if !cli.search_path.is_empty() {
        analysis = analysis.with_resolver(
            PackageResolver::new().with_search_path(SearchPathResolver::new(cli.search_path)),
        );
    }

    let summary = analysis.summary();
    let mut stdout = io::stdout().lock();
    if cli.json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        writeln!(stdout, "{}", summary.report())?;
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("{e}");
        process::exit(1);
    }
}
