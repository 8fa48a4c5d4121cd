//! Documentation coverage for Rust modules.
//!
//! `libdoccov` measures what fraction of a module's public routines are named
//! in its documentation. A routine counts as documented when a list item or a
//! level 2-4 heading of the module's documentation mentions it, in any of the
//! usual spellings: `name`, `` `name` ``, ``[`Type::name`]``, `name(args)`.
//!
//! The module's routines come from rustdoc JSON, which records where each
//! function is actually defined, so re-exported and imported functions never
//! count for or against a module. Documentation comes from a Markdown file or
//! from the `//!` comments of a Rust source file.
//!
//! ```no_run
//! use libdoccov::DocCoverage;
//!
//! let mut analysis = DocCoverage::new("my_crate::parser").with_doc_from("src/parser.rs");
//! match analysis.coverage() {
//!     Some(rating) => println!("{rating:.2}, missing: {:?}", analysis.naked()),
//!     None => println!("unrated: {:?}", analysis.why_unrated()),
//! }
//! ```

mod cargoutils;
mod coverage;
mod error;
mod extract;
mod loader;
mod normalize;
mod privacy;
mod report;
mod resolve;
mod rustdoc;
mod symbols;
mod tokenize;
mod toolchain;

pub use crate::{
    cargoutils::{ResolvedTarget, resolve_target},
    coverage::{CoverageMap, CoverageSummary, DocCoverage, Unrated},
    error::{DocCovError, Result},
    extract::{extract, is_candidate_block},
    loader::{ModuleLoader, ModuleTable, Routine},
    normalize::normalize,
    privacy::PrivacyPolicy,
    report::render as render_report,
    resolve::{DocResolver, PackageResolver, SearchPathResolver},
    rustdoc::{RustdocLoader, module_table},
    symbols::enumerate,
    tokenize::{Block, BlockKind, DocTokenizer, MarkdownTokenizer},
};
