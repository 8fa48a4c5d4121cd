//! Module loading over rustdoc JSON.
//!
//! rustdoc records, for every item it documents, the canonical path of the
//! item's definition in [`Crate::paths`]. That is what separates a function a
//! module defines from one it merely re-exports: both appear in the module's
//! item list, but only the former has the module as its canonical parent.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rustdoc_types::{Crate, Id, Impl, Item, ItemEnum, ItemKind, Module, Visibility};
use tracing::{debug, warn};

use crate::{
    cargoutils::{is_path_target, resolve_target},
    error::{DocCovError, Result},
    loader::{ModuleLoader, ModuleTable, Routine},
    toolchain::ensure_nightly,
};

/// Where the loader gets its rustdoc JSON from.
#[derive(Debug, Clone)]
enum CrateSource {
    /// Build JSON with `cargo +nightly rustdoc` for the resolved package.
    Generate,
    /// Read a prebuilt JSON file.
    Json(PathBuf),
}

/// A [`ModuleLoader`] backed by rustdoc JSON.
///
/// Targets take the form `entrypoint[::module::path]`, where the entrypoint
/// is a package directory, a source file inside a package, or a package name
/// resolved from the current workspace. Generation requires the nightly
/// toolchain; [`RustdocLoader::from_json`] skips generation entirely.
#[derive(Debug, Clone)]
pub struct RustdocLoader {
    /// JSON source.
    source: CrateSource,
    /// Suppress cargo output while generating.
    silent: bool,
}

impl Default for RustdocLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RustdocLoader {
    /// Creates a loader that generates rustdoc JSON on demand.
    pub fn new() -> Self {
        Self {
            source: CrateSource::Generate,
            silent: true,
        }
    }

    /// Creates a loader that reads a prebuilt rustdoc JSON file. Targets are
    /// then module paths inside that crate, optionally led by the crate name.
    pub fn from_json(path: impl Into<PathBuf>) -> Self {
        Self {
            source: CrateSource::Json(path.into()),
            silent: true,
        }
    }

    /// Enables or disables cargo output during generation.
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Produces the crate data and the module path the target points at.
    fn read_crate(&self, target: &str) -> Result<(Crate, Vec<String>)> {
        match &self.source {
            CrateSource::Json(path) => {
                // A path-style entrypoint only matters for locating documentation.
                let skip = usize::from(is_path_target(target));
                let module_path = target
                    .split("::")
                    .skip(skip)
                    .filter(|component| !component.is_empty())
                    .map(String::from)
                    .collect();
                Ok((read_json(path)?, module_path))
            }
            CrateSource::Generate => {
                let resolved = resolve_target(target)?;
                ensure_nightly()?;
                let json_path = rustdoc_json::Builder::default()
                    .toolchain("nightly")
                    .manifest_path(resolved.manifest_path()?)
                    .document_private_items(false)
                    .silent(self.silent)
                    .quiet(self.silent)
                    .build()
                    .map_err(|e| DocCovError::Generate(e.to_string()))?;
                debug!(path = %json_path.display(), "generated rustdoc JSON");
                Ok((read_json(&json_path)?, resolved.module_path))
            }
        }
    }
}

impl ModuleLoader for RustdocLoader {
    fn load(&self, name: &str) -> Result<ModuleTable> {
        let (crate_data, module_path) = self.read_crate(name)?;
        module_table(&crate_data, &module_path)
    }
}

/// Reads and decodes a rustdoc JSON file.
fn read_json(path: &Path) -> Result<Crate> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Builds the routine table for the module at `module_path` in `crate_data`.
///
/// A leading component equal to the crate name is skipped, so both
/// `net::tcp` and `app::net::tcp` address the same module of crate `app`.
pub fn module_table(crate_data: &Crate, module_path: &[String]) -> Result<ModuleTable> {
    let root = crate_data
        .index
        .get(&crate_data.root)
        .ok_or_else(|| DocCovError::ModuleUnavailable("crate root is missing".to_string()))?;
    let crate_name = root.name.clone().unwrap_or_default();

    let segments = match module_path.split_first() {
        Some((first, rest)) if first.replace('-', "_") == crate_name => rest,
        _ => module_path,
    };

    let mut canonical = vec![crate_name];
    let mut current = as_module(root)?;
    for segment in segments {
        let child = current
            .items
            .iter()
            .filter_map(|id| crate_data.index.get(id))
            .find(|item| {
                matches!(item.inner, ItemEnum::Module(_)) && item.name.as_deref() == Some(segment)
            })
            .ok_or_else(|| {
                DocCovError::ModuleUnavailable(format!(
                    "no module {segment} in {}",
                    canonical.join("::")
                ))
            })?;
        canonical.push(segment.clone());
        current = as_module(child)?;
    }

    let mut walker = TableBuilder {
        crate_data,
        table: ModuleTable::new(canonical.join("::")),
    };
    for id in &current.items {
        walker.visit(id);
    }
    Ok(walker.table)
}

/// Extracts the module payload of an item.
fn as_module(item: &Item) -> Result<&Module> {
    match &item.inner {
        ItemEnum::Module(module) => Ok(module),
        _ => Err(DocCovError::ModuleUnavailable(format!(
            "{} is not a module",
            item.name.as_deref().unwrap_or("?")
        ))),
    }
}

/// Collects the routines reachable through one module.
struct TableBuilder<'a> {
    /// The crate being inspected.
    crate_data: &'a Crate,
    /// The table under construction.
    table: ModuleTable,
}

impl TableBuilder<'_> {
    /// Records the routines one module member contributes.
    fn visit(&mut self, id: &Id) {
        let crate_data = self.crate_data;
        let Some(item) = crate_data.index.get(id) else {
            return;
        };
        match &item.inner {
            ItemEnum::Function(_) if is_public(item) => {
                let owner = self.owner_or_module(id, item);
                self.push(item.name.as_deref(), owner);
            }
            ItemEnum::Use(import) if !import.is_glob => {
                let Some(target) = import.id.filter(|target| self.is_function(target)) else {
                    return;
                };
                let owner = self.owner_of(&target).unwrap_or_else(|| {
                    let source_parent = import
                        .source
                        .rsplit_once("::")
                        .map_or("", |(parent, _)| parent);
                    warn!(
                        import = %import.source,
                        owner = source_parent,
                        "re-exported function has no canonical path; owner taken from the import"
                    );
                    source_parent.to_string()
                });
                self.push(Some(&import.name), owner);
            }
            ItemEnum::Struct(s) => self.visit_impls(id, item, &s.impls),
            ItemEnum::Enum(e) => self.visit_impls(id, item, &e.impls),
            ItemEnum::Union(u) => self.visit_impls(id, item, &u.impls),
            _ => {}
        }
    }

    /// Records the public methods of a type's inherent impls, owned by the
    /// module that defines the type.
    fn visit_impls(&mut self, type_id: &Id, type_item: &Item, impls: &[Id]) {
        let Some(type_name) = type_item.name.clone() else {
            return;
        };
        let crate_data = self.crate_data;
        let owner = self.owner_or_module(type_id, type_item);
        for impl_id in impls {
            let Some(ItemEnum::Impl(impl_)) = crate_data.index.get(impl_id).map(|i| &i.inner) else {
                continue;
            };
            if !is_inherent(impl_) {
                continue;
            }
            for member_id in &impl_.items {
                let Some(member) = crate_data.index.get(member_id) else {
                    continue;
                };
                if let (ItemEnum::Function(_), Some(method)) = (&member.inner, &member.name) {
                    if is_public(member) {
                        let qualified = format!("{}::{type_name}::{method}", self.table.name);
                        self.table
                            .routines
                            .push(Routine::new(qualified, owner.clone()));
                    }
                }
            }
        }
    }

    /// Records `name` as a routine of the module owned by `owner`.
    fn push(&mut self, name: Option<&str>, owner: String) {
        if let Some(name) = name {
            let qualified = format!("{}::{name}", self.table.name);
            self.table.routines.push(Routine::new(qualified, owner));
        }
    }

    /// Canonical parent path of the item's definition, if rustdoc recorded one.
    fn owner_of(&self, id: &Id) -> Option<String> {
        self.crate_data
            .paths
            .get(id)
            .and_then(|summary| summary.path.split_last())
            .map(|(_, parent)| parent.join("::"))
    }

    /// Canonical owner of a listed item, or the module being walked when
    /// rustdoc recorded no path for it.
    fn owner_or_module(&self, id: &Id, item: &Item) -> String {
        self.owner_of(id).unwrap_or_else(|| {
            warn!(
                item = item.name.as_deref().unwrap_or("?"),
                module = %self.table.name,
                "item has no canonical path; crediting it to the module"
            );
            self.table.name.clone()
        })
    }

    /// Whether `id` names a function, local or external.
    fn is_function(&self, id: &Id) -> bool {
        match self.crate_data.index.get(id) {
            Some(item) => matches!(item.inner, ItemEnum::Function(_)),
            None => self
                .crate_data
                .paths
                .get(id)
                .is_some_and(|summary| summary.kind == ItemKind::Function),
        }
    }
}

/// Whether rustdoc lists the item as `pub`.
fn is_public(item: &Item) -> bool {
    matches!(item.visibility, Visibility::Public)
}

/// Inherent impls only: trait impl methods are documented on the trait.
fn is_inherent(impl_: &Impl) -> bool {
    impl_.trait_.is_none() && !impl_.is_synthetic && impl_.blanket_impl.is_none()
}
