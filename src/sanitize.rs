//! Text cleanup for free-text fields and file names.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<.*?>").expect("valid markup tag regex"));

/// Remove every `<...>` span.
///
/// Meant for the short anchor markup in the `source` field
/// (`<a href="...">Twitter for iPhone</a>`); it is not an HTML parser.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    MARKUP_TAG.replace_all(text, "").into_owned()
}

/// Reduce a name to a single safe path segment.
///
/// Keeps ASCII alphanumerics plus space, `.`, `_` and `-`, drops everything
/// else (separators included), then trims trailing whitespace.
#[must_use]
pub fn sanitize_path_segment(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-'))
        .collect();
    kept.trim_end().to_string()
}
