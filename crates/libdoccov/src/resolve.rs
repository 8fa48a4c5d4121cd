//! Locates the documentation source for a module.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cargoutils::{
    ResolvedTarget, crate_name, current_package, is_path_target, resolve_target,
};

/// Finds the documentation file for a module identifier.
pub trait DocResolver: Send {
    /// Returns the documentation path for `module`, if one exists.
    fn find(&self, module: &str) -> Option<PathBuf>;
}

/// Searches a list of directories for Markdown or Rust files named after the
/// module path.
///
/// For `app::net::tcp` each directory is probed for `app/net/tcp.md`,
/// `app/net/tcp.rs` and `app/net/tcp/mod.rs`, then the same without the
/// leading crate component (`net/tcp.md`, ...), since source trees rarely
/// carry the crate name. A bare crate name also probes `README.md` and
/// `lib.rs`. The first existing file wins.
#[derive(Debug, Clone)]
pub struct SearchPathResolver {
    /// Directories probed in order.
    dirs: Vec<PathBuf>,
}

impl Default for SearchPathResolver {
    fn default() -> Self {
        Self::new([".", "docs", "src"])
    }
}

impl SearchPathResolver {
    /// Creates a resolver over the given directories.
    pub fn new<P: Into<PathBuf>>(dirs: impl IntoIterator<Item = P>) -> Self {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// The directories this resolver searches.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Relative paths probed inside each search directory, in order.
    fn candidates(module: &str) -> Vec<PathBuf> {
        let components: Vec<&str> = module
            .split("::")
            .filter(|component| !component.is_empty())
            .collect();
        let Some((_, rest)) = components.split_first() else {
            return Vec::new();
        };

        let mut candidates = Self::stems(&components);
        candidates.extend(Self::stems(rest));
        candidates
    }

    /// Files that may document the module at `segments`; the crate root when
    /// `segments` is empty.
    fn stems(segments: &[&str]) -> Vec<PathBuf> {
        if segments.is_empty() {
            return vec![PathBuf::from("README.md"), PathBuf::from("lib.rs")];
        }
        let stem: PathBuf = segments.iter().collect();
        vec![
            stem.with_extension("md"),
            stem.with_extension("rs"),
            stem.join("mod.rs"),
        ]
    }

    /// Returns the first candidate under `dir` that exists as a file.
    fn probe(dir: &Path, candidates: &[PathBuf]) -> Option<PathBuf> {
        candidates
            .iter()
            .map(|candidate| dir.join(candidate))
            .find(|path| path.is_file())
    }
}

impl DocResolver for SearchPathResolver {
    fn find(&self, module: &str) -> Option<PathBuf> {
        let candidates = Self::candidates(module);
        self.dirs
            .iter()
            .find_map(|dir| Self::probe(dir, &candidates))
    }
}

/// Looks for documentation inside the package a target resolves to.
///
/// Targets are resolved the way the rustdoc loader resolves them, and the
/// package directory, its `docs` and its `src` are probed for the module. A
/// path-style target (`./pkg::net`, `src/lib.rs::net`) or a workspace member
/// (`member::net`) is only ever looked up in its own package. A bare module
/// identifier, one naming the current package or nothing cargo can resolve,
/// falls back to the search path.
#[derive(Debug, Clone, Default)]
pub struct PackageResolver {
    /// Fallback for bare module identifiers.
    search_path: SearchPathResolver,
}

impl PackageResolver {
    /// Creates a resolver with the default search path fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `search_path` for bare module identifiers.
    pub fn with_search_path(mut self, search_path: SearchPathResolver) -> Self {
        self.search_path = search_path;
        self
    }

    /// Probes the package directory of `target` for its module's documentation.
    fn find_in_package(target: &ResolvedTarget) -> Option<PathBuf> {
        let package_dir = &target.package_dir;
        let name = crate_name(package_dir);
        let module_path = match target.module_path.split_first() {
            Some((first, rest)) if name.as_deref() == Some(first.replace('-', "_").as_str()) => rest,
            _ => target.module_path.as_slice(),
        };
        let segments: Vec<&str> = module_path.iter().map(String::as_str).collect();
        let candidates = SearchPathResolver::stems(&segments);

        [
            package_dir.clone(),
            package_dir.join("docs"),
            package_dir.join("src"),
        ]
        .iter()
        .find_map(|dir| SearchPathResolver::probe(dir, &candidates))
    }
}

impl DocResolver for PackageResolver {
    fn find(&self, module: &str) -> Option<PathBuf> {
        let target = match resolve_target(module) {
            Ok(target) => target,
            Err(e) if is_path_target(module) => {
                debug!(module, error = %e, "target does not resolve to a package");
                return None;
            }
            Err(_) => return self.search_path.find(module),
        };

        let found = Self::find_in_package(&target);
        let is_bare =
            !is_path_target(module) && current_package().as_ref() == Some(&target.package_dir);
        if found.is_some() || !is_bare {
            return found;
        }
        self.search_path.find(module)
    }
}
