//! Human readable coverage reports.

use crate::coverage::Unrated;

/// Formats a coverage report.
///
/// A rated module gets a rating line followed, when anything is undocumented,
/// by a line naming the uncovered routines. An unrated module gets a single
/// line with the reason, if known.
pub fn render(
    package: &str,
    rating: Option<f64>,
    naked: &[String],
    why_unrated: Option<&Unrated>,
) -> String {
    let Some(rating) = rating else {
        return match why_unrated {
            Some(reason) => format!("{package} has no coverage rating: {reason}"),
            None => format!("{package} has no coverage rating"),
        };
    };

    let mut lines = vec![format!("{package} has a coverage rating of {rating}")];
    match naked {
        [] => {}
        [only] => lines.push(format!("'{only}' is uncovered")),
        _ => lines.push(format!("The following are uncovered: {}", naked.join(", "))),
    }
    lines.join("\n")
}
