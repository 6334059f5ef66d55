//! Key pattern matching.

use regex::Regex;

/// Compiles a key pattern into an anchored regex.
///
/// `*` matches any run of characters (including none); every other character
/// is literal, so `usage:*` matches `usage:total` but not `xusage:total`.
pub fn pattern_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{}$", body))
}
