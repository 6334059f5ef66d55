//! CSS selector parsing utilities.

use scraper::Selector;

/// Parses a CSS selector that must succeed (for compile-time constants).
///
/// Every selector in this crate is a string literal held in a `LazyLock`, so
/// a parse failure can only be a typo in the source.
///
/// # Arguments
///
/// * `selector_str` - The CSS selector string to parse
/// * `context` - Context description for error messages
///
/// # Panics
///
/// Panics if the selector cannot be parsed (indicates a programming error).
pub fn parse_selector_unsafe(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        panic!(
            "Failed to parse CSS selector '{}' in {}: {}. This is a programming error.",
            selector_str, context, e
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_selector() {
        let selector = parse_selector_unsafe("meta[property='og:title']", "test");
        let html = scraper::Html::parse_document(r#"<meta property="og:title" content="x">"#);
        assert_eq!(html.select(&selector).count(), 1);
    }

    #[test]
    #[should_panic(expected = "programming error")]
    fn test_invalid_selector_panics() {
        parse_selector_unsafe("[[[", "test");
    }
}
