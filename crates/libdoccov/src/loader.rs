//! The module loader contract.

use crate::error::Result;

/// A routine as seen from a loaded module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    /// Fully qualified name, e.g. `mycrate::parser::parse`.
    pub qualified_name: String,
    /// Canonical path of the module that defines the routine's body.
    pub owner: String,
}

impl Routine {
    /// Creates a routine record.
    pub fn new(qualified_name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            owner: owner.into(),
        }
    }

    /// The routine name with its qualification stripped.
    pub fn bare_name(&self) -> &str {
        self.qualified_name
            .rsplit_once("::")
            .map_or(self.qualified_name.as_str(), |(_, name)| name)
    }
}

/// Everything callable that a module exposes, defined there or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleTable {
    /// Canonical path of the module.
    pub name: String,
    /// Routines reachable through the module, including imports.
    pub routines: Vec<Routine>,
}

impl ModuleTable {
    /// Creates an empty table for the named module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            routines: Vec::new(),
        }
    }

    /// Adds a routine defined by this module.
    pub fn with_local(mut self, name: &str) -> Self {
        let qualified = format!("{}::{name}", self.name);
        let owner = self.name.clone();
        self.routines.push(Routine::new(qualified, owner));
        self
    }

    /// Adds a routine reachable through this module but defined by `owner`.
    pub fn with_foreign(mut self, name: &str, owner: &str) -> Self {
        let qualified = format!("{}::{name}", self.name);
        self.routines.push(Routine::new(qualified, owner));
        self
    }
}

/// Resolves a module identifier into its routine table.
pub trait ModuleLoader: Send {
    /// Loads the named module.
    ///
    /// Fails with [`DocCovError::ModuleUnavailable`](crate::DocCovError::ModuleUnavailable)
    /// when the module cannot be located or loaded.
    fn load(&self, name: &str) -> Result<ModuleTable>;
}
