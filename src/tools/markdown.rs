//! Markdown to HTML rendering.

use pulldown_cmark::{html, Options, Parser};

/// Renders CommonMark (plus tables, strikethrough and task lists) to HTML and
/// sanitizes the result with the default allow-list.
pub fn render_markdown(text: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut rendered = String::new();
    html::push_html(&mut rendered, Parser::new_ext(text, options));
    ammonia::clean(&rendered)
}
