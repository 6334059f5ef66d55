//! Utilities for sanitizing caller-controlled strings.
//!
//! Caller input ends up in two sensitive places: store keys (where `:` is the
//! namespace separator) and generated SVG/XML (where markup must be escaped).

/// Makes a caller-supplied value (client IP, visitor id) safe to embed in a
/// store key.
///
/// Colons (IPv6) become underscores; anything outside `[A-Za-z0-9._-]` is
/// dropped. An empty result falls back to `unknown`.
pub fn sanitize_key_segment(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter_map(|c| match c {
            ':' => Some('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => Some(c),
            _ => None,
        })
        .collect();

    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}

/// Escapes text for inclusion in XML/SVG content or attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => escaped.push(c),
        }
    }
    escaped
}
