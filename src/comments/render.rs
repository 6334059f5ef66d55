//! Markdown rendering and HTML sanitization for comment text.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::{html, Options, Parser};

use crate::config::{DEFAULT_COMMENT_AUTHOR, MAX_AUTHOR_CHARS};

const ALLOWED_TAGS: [&str; 11] = [
    "b",
    "i",
    "em",
    "strong",
    "a",
    "code",
    "pre",
    "ul",
    "ol",
    "li",
    "blockquote",
];
const ALLOWED_LINK_ATTRIBUTES: [&str; 3] = ["href", "name", "target"];
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Renders comment markdown to HTML restricted to a small tag allow-list.
///
/// Tags outside the list are removed but their text is kept; `<script>` and
/// `<style>` are dropped with their content. Links keep only `href`, `name`
/// and `target`, and only `http`/`https` URLs survive.
pub fn render_comment(markdown: &str) -> String {
    let mut rendered = String::new();
    html::push_html(&mut rendered, Parser::new_ext(markdown, Options::empty()));

    ammonia::Builder::default()
        .tags(HashSet::from(ALLOWED_TAGS))
        .tag_attributes(HashMap::from([("a", HashSet::from(ALLOWED_LINK_ATTRIBUTES))]))
        .generic_attributes(HashSet::new())
        .url_schemes(HashSet::from(ALLOWED_SCHEMES))
        .link_rel(None)
        .clean(&rendered)
        .to_string()
        .trim()
        .to_string()
}

/// Strips all markup from an author name, falling back to the default author
/// when nothing is left.
pub fn clean_author(author: Option<&str>) -> String {
    let cleaned = ammonia::Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(author.unwrap_or_default())
        .to_string();
    let cleaned: String = cleaned.trim().chars().take(MAX_AUTHOR_CHARS).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        DEFAULT_COMMENT_AUTHOR.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_emphasis_kept() {
        assert_eq!(
            render_comment("**bold** and *it*"),
            "<strong>bold</strong> and <em>it</em>"
        );
    }

    #[test]
    fn test_script_removed() {
        let html = render_comment("hi <script>alert(1)</script>");
        assert!(!html.contains("script"));
        assert!(!html.contains("alert"));
        assert!(html.contains("hi"));
    }

    #[test]
    fn test_disallowed_tags_stripped_text_kept() {
        let html = render_comment("# Title\n\n<img src=x onerror=alert(1)>");
        assert!(!html.contains("<h1"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("<p>"));
        assert!(html.contains("Title"));
    }

    #[test]
    fn test_link_schemes() {
        let html = render_comment("[ok](https://example.com) [bad](javascript:alert(1))");
        assert!(html.contains(r#"<a href="https://example.com">ok</a>"#));
        assert!(!html.contains("javascript"));
    }

    #[test]
    fn test_link_attributes_filtered() {
        let html = render_comment(
            r#"<a href="https://example.com" target="_blank" onclick="x()" class="c">l</a>"#,
        );
        assert!(html.contains(r#"target="_blank""#));
        assert!(!html.contains("onclick"));
        assert!(!html.contains("class"));
        assert!(!html.contains("rel="));
    }

    #[test]
    fn test_clean_author() {
        assert_eq!(clean_author(None), "Anonymous");
        assert_eq!(clean_author(Some("   ")), "Anonymous");
        assert_eq!(clean_author(Some("<b>Ann</b>")), "Ann");
        assert_eq!(clean_author(Some("<script>x</script>")), "Anonymous");
        assert_eq!(clean_author(Some(&"a".repeat(80))).chars().count(), 50);
    }
}
