//! Reduces raw documentation mentions to bare identifier names.
//!
//! Normalization is an ordered list of rewrite rules applied to a working
//! copy of the candidate. Every rule is tried, whether or not an earlier one
//! fired, so `` `Parser::parse(input)` `` passes through the path, markup and
//! argument rules in turn and comes out as `parse`.

use once_cell::sync::Lazy;
use regex::Regex;

/// A qualified path; captures the final segment.
static QUALIFIED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:::\w+)*::(\w+)").expect("path pattern must compile"));
/// An identifier followed by an argument list, a statement end or a colon.
static ARGUMENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\s*[;(:]").expect("argument pattern must compile"));

/// A single rewrite. Returns `None` when the rule does not apply.
type Rule = fn(&str) -> Option<String>;

/// Rewrite rules in application order.
const RULES: &[Rule] = &[method_arrow, qualified_path, markup, arguments];

/// Normalizes a candidate into the name used for symbol lookup.
///
/// Always returns something; text that no rule recognizes comes back as is.
pub fn normalize(candidate: &str) -> String {
    let mut working = candidate.to_string();
    for rule in RULES {
        if let Some(rewritten) = rule(&working) {
            working = rewritten;
        }
    }
    working
}

/// `value->name` becomes `name`.
fn method_arrow(text: &str) -> Option<String> {
    text.find("->").map(|at| text[at + 2..].to_string())
}

/// `module::Type::name` becomes `name`.
fn qualified_path(text: &str) -> Option<String> {
    QUALIFIED.captures(text).map(|caps| caps[1].to_string())
}

/// Drops markup delimiters: `<name>`, `` `name` ``, `[name]`, `**name**`.
fn markup(text: &str) -> Option<String> {
    let is_markup = |c: char| matches!(c, '<' | '>' | '`' | '[' | ']' | '*');
    text.contains(is_markup)
        .then(|| text.chars().filter(|&c| !is_markup(c)).collect())
}

/// `name(args)`, `name;` and `name:` become `name`.
fn arguments(text: &str) -> Option<String> {
    ARGUMENTS.captures(text).map(|caps| caps[1].to_string())
}
