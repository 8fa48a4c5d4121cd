use std::{
    env,
    path::{Path, PathBuf, absolute},
};

use cargo::{core::Workspace, util::context::GlobalContext};

use crate::error::{DocCovError, Result};

/// Heuristic for whether a target's entrypoint names a filesystem location.
fn is_path(s: &str) -> bool {
    s.contains('.') || s.contains('/') || s.contains('\\')
}

/// A target split into the package that defines it and the module path inside
/// that package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Directory holding the package's Cargo.toml.
    pub package_dir: PathBuf,
    /// Module path components inside the package. May start with the crate name.
    pub module_path: Vec<String>,
}

impl ResolvedTarget {
    /// Absolute path to the package manifest.
    pub fn manifest_path(&self) -> Result<PathBuf> {
        Ok(absolute(self.package_dir.join("Cargo.toml"))?)
    }
}

/// Walks up from `start_dir` to the first directory containing a Cargo.toml.
pub fn nearest_manifest(start_dir: &Path) -> Option<PathBuf> {
    let mut current_dir = start_dir.to_path_buf();
    loop {
        if current_dir.join("Cargo.toml").exists() {
            return Some(current_dir);
        }
        if !current_dir.pop() {
            return None;
        }
    }
}

/// Whether the entrypoint of `target` (the part before the first `::`) names
/// a filesystem location rather than a package.
pub fn is_path_target(target: &str) -> bool {
    target.split("::").next().is_some_and(is_path)
}

/// The package that the current directory belongs to.
pub fn current_package() -> Option<PathBuf> {
    env::current_dir()
        .ok()
        .and_then(|cwd| nearest_manifest(&cwd))
}

/// The crate name of the package in `package_dir`, dashes as underscores.
pub fn crate_name(package_dir: &Path) -> Option<String> {
    cargo_toml::Manifest::from_path(package_dir.join("Cargo.toml"))
        .ok()?
        .package
        .map(|package| package.name().replace('-', "_"))
}

/// True when `dir` holds a virtual workspace manifest (a workspace with no
/// package of its own).
fn is_workspace(dir: &Path) -> bool {
    cargo_toml::Manifest::from_path(dir.join("Cargo.toml"))
        .map_or(false, |m| m.workspace.is_some() && m.package.is_none())
}

/// Finds the workspace member called `name`, accepting either dash or
/// underscore spelling.
fn find_workspace_package(dir: &Path, name: &str) -> Result<Option<PathBuf>> {
    let manifest_path = absolute(dir.join("Cargo.toml"))?;
    let underscored = name.replace('-', "_");

    let config = GlobalContext::default().map_err(|e| DocCovError::Cargo(e.to_string()))?;
    let workspace =
        Workspace::new(&manifest_path, &config).map_err(|e| DocCovError::Cargo(e.to_string()))?;

    Ok(workspace
        .members()
        .find(|package| {
            let package_name = package.name();
            package_name.as_str() == name || package_name.as_str().replace('-', "_") == underscored
        })
        .and_then(|package| package.manifest_path().parent().map(Path::to_path_buf)))
}

/// Locates the package for `components` under `dir`. In a workspace the first
/// component must name a member package.
fn search_package(dir: &Path, components: &[String]) -> Result<Option<ResolvedTarget>> {
    if !dir.join("Cargo.toml").exists() {
        return Ok(None);
    }
    if !is_workspace(dir) {
        return Ok(Some(ResolvedTarget {
            package_dir: dir.to_path_buf(),
            module_path: components.to_vec(),
        }));
    }
    let Some((first, rest)) = components.split_first() else {
        return Ok(None);
    };
    Ok(find_workspace_package(dir, first)?.map(|package_dir| ResolvedTarget {
        package_dir,
        module_path: rest.to_vec(),
    }))
}

/// Splits a target into a package directory and a module path.
///
/// Accepted forms:
///
/// - `/package/path` or `/package/path::module::path`
/// - `src/parser.rs::module`: the file only locates the enclosing package
/// - `/workspace/path::member::module`
/// - `member::module` or `crate_name::module` from inside a workspace or package
pub fn resolve_target(target: &str) -> Result<ResolvedTarget> {
    let components: Vec<String> = target.split("::").map(String::from).collect();
    let Some((entry, rest)) = components.split_first() else {
        return Err(DocCovError::ModuleUnavailable("empty target".to_string()));
    };
    if entry.is_empty() {
        return Err(DocCovError::ModuleUnavailable(format!(
            "invalid target {target:?}"
        )));
    }

    if is_path(entry) {
        let path = Path::new(entry);
        if !path.exists() {
            return Err(DocCovError::ModuleUnavailable(format!(
                "path {entry} does not exist"
            )));
        }
        let start = if path.is_file() {
            path.parent().unwrap_or(path)
        } else {
            path
        };
        let root = nearest_manifest(start).ok_or(DocCovError::ManifestNotFound)?;
        return search_package(&root, rest)?.ok_or_else(|| {
            DocCovError::ModuleUnavailable(format!(
                "can't find {} in {}",
                rest.join("::"),
                root.display()
            ))
        });
    }

    let cwd = env::current_dir()?;
    let root = nearest_manifest(&cwd).ok_or(DocCovError::ManifestNotFound)?;
    search_package(&root, &components)?.ok_or_else(|| {
        DocCovError::ModuleUnavailable(format!(
            "{target} is not a package in the workspace at {}",
            root.display()
        ))
    })
}
