use std::sync::LazyLock;

use regex::Regex;

/// Commas, semicolons and newlines separate ingredients. Runs collapse.
static SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;\n]+").expect("Invalid separator regex"));

/// Split a pasted ingredient list into lower-cased candidate names.
///
/// Tokens are trimmed, and anything shorter than two characters is dropped.
/// Order is preserved and repeated names are kept, since a label may list
/// the same ingredient more than once.
pub fn tokenize(raw: &str) -> Vec<String> {
    let lower = raw.to_lowercase();
    SEPARATOR_REGEX
        .split(&lower)
        .map(str::trim)
        .filter(|token| token.chars().count() > 1)
        .map(str::to_string)
        .collect()
}
