//! Name-based exclusion of routines from coverage accounting.

use once_cell::sync::Lazy;
use regex::Regex;

/// Patterns excluded when the caller does not supply a replacement set.
static DEFAULT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["^_", "^import$", "^DESTROY$", "^AUTOLOAD$", "^bootstrap$"]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("default privacy pattern must compile"))
        .collect()
});

/// The set of patterns that mark a routine name as private.
///
/// A name is private when any pattern finds a match anywhere in it. Patterns
/// that want whole-name semantics must anchor themselves.
#[derive(Debug, Clone)]
pub struct PrivacyPolicy {
    /// Base patterns: the defaults, or a full caller-supplied replacement.
    base: Vec<Regex>,
    /// Patterns appended to the base set.
    additional: Vec<Regex>,
}

impl Default for PrivacyPolicy {
    fn default() -> Self {
        Self {
            base: DEFAULT_PATTERNS.clone(),
            additional: Vec::new(),
        }
    }
}

impl PrivacyPolicy {
    /// Replaces the base pattern set, keeping any appended patterns.
    pub fn with_private(mut self, patterns: Vec<Regex>) -> Self {
        self.base = patterns;
        self
    }

    /// Appends patterns to the active set.
    pub fn with_also_private(mut self, patterns: Vec<Regex>) -> Self {
        self.additional.extend(patterns);
        self
    }

    /// Returns true if `name` matches any active pattern.
    pub fn is_private(&self, name: &str) -> bool {
        self.patterns().any(|pattern| pattern.is_match(name))
    }

    /// Iterates over the active patterns, base set first.
    pub fn patterns(&self) -> impl Iterator<Item = &Regex> {
        self.base.iter().chain(self.additional.iter())
    }
}
