use std::{
    collections::{BTreeMap, HashSet},
    path::PathBuf,
};

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    error::DocCovError,
    extract::extract,
    loader::ModuleLoader,
    normalize::normalize,
    privacy::PrivacyPolicy,
    report,
    resolve::{DocResolver, PackageResolver},
    rustdoc::RustdocLoader,
    symbols::enumerate,
    tokenize::{DocTokenizer, MarkdownTokenizer},
};

/// Eligible symbol name to whether its documentation mentions it.
pub type CoverageMap = BTreeMap<String, bool>;

/// Why a coverage computation produced no rating.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Unrated {
    /// The module could not be located or loaded.
    #[error("couldn't load module: {0}")]
    ModuleUnavailable(String),

    /// No documentation source was found, or it could not be read.
    #[error("couldn't find documentation: {0}")]
    DocumentationSourceMissing(String),

    /// The module defines no eligible routines.
    #[error("no public symbols defined")]
    EmptySymbolSet,
}

/// Snapshot of one coverage computation, suitable for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    /// The analyzed module identifier.
    pub package: String,
    /// Documented fraction of eligible routines, if a rating was possible.
    pub rating: Option<f64>,
    /// Documented eligible routines, sorted.
    pub covered: Vec<String>,
    /// Undocumented eligible routines, sorted.
    pub uncovered: Vec<String>,
    /// Reason for a missing rating.
    pub why_unrated: Option<Unrated>,
}

impl CoverageSummary {
    /// Renders the human readable report for this summary.
    pub fn report(&self) -> String {
        report::render(
            &self.package,
            self.rating,
            &self.uncovered,
            self.why_unrated.as_ref(),
        )
    }
}

/// Measures how much of a module's public routine surface its documentation
/// mentions.
///
/// The computation enumerates the routines the module itself defines (imports
/// and re-exports excluded, privacy patterns applied), collects every
/// identifier named by a list item or a level 2-4 heading of the module's
/// documentation, and reports the documented fraction.
///
/// Every call to [`coverage`](Self::coverage) starts from scratch. The
/// resulting per-symbol map is cached and serves [`covered`](Self::covered)
/// and [`naked`](Self::naked) until the next call. The cache makes those
/// queries take `&mut self`; a `DocCoverage` is not meant to be shared across
/// threads without external synchronization, though it can be moved to one.
pub struct DocCoverage {
    /// Identifier of the module under analysis.
    package: String,
    /// Explicit documentation source; skips resolution when set.
    doc_from: Option<PathBuf>,
    /// Emit progress diagnostics.
    debug: bool,
    /// Names excluded from accounting.
    policy: PrivacyPolicy,
    /// Names treated as documented regardless of the documentation.
    trustme: Vec<Regex>,
    /// Module loader collaborator.
    loader: Box<dyn ModuleLoader>,
    /// Documentation resolver collaborator.
    resolver: Box<dyn DocResolver>,
    /// Documentation tokenizer collaborator.
    tokenizer: Box<dyn DocTokenizer>,
    /// Result of the most recent computation.
    symbols: Option<CoverageMap>,
    /// Reason the most recent computation produced no rating.
    why_unrated: Option<Unrated>,
}

impl DocCoverage {
    /// Creates an analysis of `package` with the default privacy patterns,
    /// rustdoc-backed module loading and documentation looked up in the
    /// target's package.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            doc_from: None,
            debug: false,
            policy: PrivacyPolicy::default(),
            trustme: Vec::new(),
            loader: Box::new(RustdocLoader::new()),
            resolver: Box::new(PackageResolver::default()),
            tokenizer: Box::new(MarkdownTokenizer),
            symbols: None,
            why_unrated: None,
        }
    }

    /// Replaces the default privacy patterns.
    pub fn with_private(mut self, patterns: Vec<Regex>) -> Self {
        self.policy = self.policy.with_private(patterns);
        self
    }

    /// Adds privacy patterns to the active set.
    pub fn with_also_private(mut self, patterns: Vec<Regex>) -> Self {
        self.policy = self.policy.with_also_private(patterns);
        self
    }

    /// Treats routines matching these patterns as documented.
    pub fn with_trustme(mut self, patterns: Vec<Regex>) -> Self {
        self.trustme.extend(patterns);
        self
    }

    /// Reads documentation from `path` instead of searching for it.
    pub fn with_doc_from(mut self, path: impl Into<PathBuf>) -> Self {
        self.doc_from = Some(path.into());
        self
    }

    /// Enables or disables progress diagnostics.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Uses a different module loader.
    pub fn with_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Uses a different documentation resolver.
    pub fn with_resolver(mut self, resolver: impl DocResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Uses a different documentation tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: impl DocTokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// The module identifier under analysis.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The active privacy policy.
    pub fn policy(&self) -> &PrivacyPolicy {
        &self.policy
    }

    /// Computes the documented fraction of eligible routines.
    ///
    /// Returns `None` when no rating can be given: the documentation or the
    /// module could not be found, or the module has no eligible routines.
    /// [`why_unrated`](Self::why_unrated) says which.
    pub fn coverage(&mut self) -> Option<f64> {
        match self.compute() {
            Ok(symbols) if symbols.is_empty() => {
                self.symbols = Some(symbols);
                self.unrated(Unrated::EmptySymbolSet)
            }
            Ok(symbols) => {
                let total = symbols.len();
                let documented = symbols.values().filter(|documented| **documented).count();
                if self.debug {
                    debug!(package = %self.package, documented, total, "coverage computed");
                }
                self.symbols = Some(symbols);
                self.why_unrated = None;
                Some(documented as f64 / total as f64)
            }
            Err(reason) => {
                self.symbols = None;
                self.unrated(reason)
            }
        }
    }

    /// Eligible routines the documentation mentions, sorted.
    ///
    /// Computes coverage first if nothing is cached yet.
    pub fn covered(&mut self) -> Vec<String> {
        self.ensure_computed();
        self.cached(true)
    }

    /// Eligible routines the documentation does not mention, sorted.
    ///
    /// Computes coverage first if nothing is cached yet.
    pub fn naked(&mut self) -> Vec<String> {
        self.ensure_computed();
        self.cached(false)
    }

    /// Alias for [`naked`](Self::naked).
    pub fn uncovered(&mut self) -> Vec<String> {
        self.naked()
    }

    /// The per-symbol map from the most recent computation.
    pub fn symbols(&self) -> Option<&CoverageMap> {
        self.symbols.as_ref()
    }

    /// Why the most recent computation produced no rating.
    pub fn why_unrated(&self) -> Option<&Unrated> {
        self.why_unrated.as_ref()
    }

    /// Computes coverage and snapshots the outcome.
    pub fn summary(&mut self) -> CoverageSummary {
        let rating = self.coverage();
        CoverageSummary {
            package: self.package.clone(),
            rating,
            covered: self.cached(true),
            uncovered: self.cached(false),
            why_unrated: self.why_unrated.clone(),
        }
    }

    /// Computes coverage unless a map is already cached.
    fn ensure_computed(&mut self) {
        if self.symbols.is_none() {
            self.coverage();
        }
    }

    /// Cached names whose documented flag equals `documented`.
    fn cached(&self, documented: bool) -> Vec<String> {
        self.symbols
            .iter()
            .flatten()
            .filter(|(_, flag)| **flag == documented)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Records `reason` as the outcome of the latest computation.
    fn unrated(&mut self, reason: Unrated) -> Option<f64> {
        if self.debug {
            debug!(package = %self.package, %reason, "no coverage rating");
        }
        self.why_unrated = Some(reason);
        None
    }

    /// Runs one full pass: documentation, symbols, and the map joining them.
    fn compute(&self) -> Result<CoverageMap, Unrated> {
        let documented = self.documented_names()?;

        let module = self.loader.load(&self.package).map_err(|e| match e {
            DocCovError::ModuleUnavailable(reason) => Unrated::ModuleUnavailable(reason),
            other => Unrated::ModuleUnavailable(other.to_string()),
        })?;
        let eligible = enumerate(&module, &self.policy);
        if self.debug {
            debug!(
                module = %module.name,
                routines = module.routines.len(),
                eligible = eligible.len(),
                "enumerated symbols"
            );
        }

        Ok(eligible
            .into_iter()
            .map(|name| {
                let is_documented = documented.contains(&name)
                    || self.trustme.iter().any(|pattern| pattern.is_match(&name));
                (name, is_documented)
            })
            .collect())
    }

    /// Normalized names mentioned by the module's documentation.
    fn documented_names(&self) -> Result<HashSet<String>, Unrated> {
        let path = match &self.doc_from {
            Some(path) if path.is_file() => path.clone(),
            Some(path) => {
                return Err(Unrated::DocumentationSourceMissing(
                    path.display().to_string(),
                ));
            }
            None => self.resolver.find(&self.package).ok_or_else(|| {
                Unrated::DocumentationSourceMissing(format!("no documentation for {}", self.package))
            })?,
        };
        if self.debug {
            debug!(path = %path.display(), "reading documentation");
        }

        let blocks = self.tokenizer.tokenize(&path).map_err(|e| {
            Unrated::DocumentationSourceMissing(format!("{}: {e}", path.display()))
        })?;
        let names: HashSet<String> = extract(&blocks)
            .iter()
            .map(|candidate| normalize(candidate))
            .collect();
        if self.debug {
            debug!(blocks = blocks.len(), names = names.len(), "parsed documentation");
        }
        Ok(names)
    }
}
