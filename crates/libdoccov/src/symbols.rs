//! Enumerates the routines a module owns and may be held accountable for.

use std::collections::BTreeSet;

use crate::{loader::ModuleTable, privacy::PrivacyPolicy};

/// Returns the bare names of routines that `module` defines itself and that
/// `policy` does not exclude.
///
/// Routines whose defining owner is any other module (imports, re-exports)
/// are skipped regardless of how they are documented.
pub fn enumerate(module: &ModuleTable, policy: &PrivacyPolicy) -> BTreeSet<String> {
    module
        .routines
        .iter()
        .filter(|routine| routine.owner == module.name)
        .map(|routine| routine.bare_name())
        .filter(|name| !policy.is_private(name))
        .map(str::to_string)
        .collect()
}
