//! Text statistics and transforms.

use serde::Serialize;
use strum_macros::EnumString;

use crate::config::READING_WORDS_PER_MINUTE;
use crate::error_handling::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub words: usize,
    pub lines: usize,
    /// Rounded up; 0 for empty text
    pub reading_time_minutes: usize,
}

/// Counts characters (Unicode scalar values), words, and lines, and
/// estimates reading time at 200 words per minute.
pub fn text_stats(text: &str) -> TextStats {
    let words = text.split_whitespace().count();
    TextStats {
        characters: text.chars().count(),
        characters_no_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
        words,
        lines: text.lines().count(),
        reading_time_minutes: words.div_ceil(READING_WORDS_PER_MINUTE),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TextAction {
    Upper,
    Lower,
    Title,
    Slug,
    Reverse,
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

pub fn transform(text: &str, action: TextAction) -> String {
    match action {
        TextAction::Upper => text.to_uppercase(),
        TextAction::Lower => text.to_lowercase(),
        TextAction::Title => title_case(text),
        TextAction::Slug => slugify(text),
        TextAction::Reverse => text.chars().rev().collect(),
    }
}

/// Parses the action name and applies it.
pub fn transform_request(text: &str, action: Option<&str>) -> Result<String, ApiError> {
    let action: TextAction = action
        .unwrap_or_default()
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request("Action must be one of upper, lower, title, slug, reverse"))?;
    Ok(transform(text, action))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats() {
        let stats = text_stats("Hello world\nsecond line here");
        assert_eq!(stats.characters, 28);
        assert_eq!(stats.characters_no_spaces, 24);
        assert_eq!(stats.words, 5);
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.reading_time_minutes, 1);
    }

    #[test]
    fn test_stats_empty_and_reading_time() {
        let stats = text_stats("");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.lines, 0);
        assert_eq!(stats.reading_time_minutes, 0);

        let long = "word ".repeat(201);
        assert_eq!(text_stats(&long).reading_time_minutes, 2);
        assert_eq!(text_stats("héllo").characters, 5);
    }

    #[test]
    fn test_transforms() {
        assert_eq!(transform("MiXed", TextAction::Upper), "MIXED");
        assert_eq!(transform("MiXed", TextAction::Lower), "mixed");
        assert_eq!(transform("hello wORLD  again", TextAction::Title), "Hello World  Again");
        assert_eq!(transform("abc", TextAction::Reverse), "cba");
    }

    #[test]
    fn test_slug() {
        assert_eq!(transform("  Hello, World! 2024 ", TextAction::Slug), "hello-world-2024");
        assert_eq!(transform("Rust & Axum -- Guide", TextAction::Slug), "rust-axum-guide");
        assert_eq!(transform("!!!", TextAction::Slug), "");
    }

    #[test]
    fn test_transform_request_rejects_unknown_action() {
        assert_eq!(transform_request("a", Some("UPPER")).unwrap(), "A");
        assert!(transform_request("a", Some("shout")).is_err());
        assert!(transform_request("a", None).is_err());
    }
}
