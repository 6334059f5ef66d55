//! SVG badge rendering.

use strum_macros::EnumString;

use crate::utils::sanitize::escape_xml;

/// Approximate advance width of one character at 11px Verdana.
const CHAR_WIDTH: usize = 7;
const PADDING: usize = 10;
const HEIGHT: usize = 20;

/// Badge color scheme. Unknown names fall back to [`BadgeTheme::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BadgeTheme {
    #[default]
    Default,
    Dark,
    Blue,
    Green,
}

impl BadgeTheme {
    pub fn from_param(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or_default()
    }

    /// `(label background, value background, text)`
    fn colors(self) -> (&'static str, &'static str, &'static str) {
        match self {
            BadgeTheme::Default => ("#555", "#4c1", "#fff"),
            BadgeTheme::Dark => ("#222", "#444", "#eee"),
            BadgeTheme::Blue => ("#555", "#007ec6", "#fff"),
            BadgeTheme::Green => ("#555", "#97ca00", "#fff"),
        }
    }
}

fn text_width(text: &str) -> usize {
    text.chars().count() * CHAR_WIDTH + PADDING
}

/// Renders a two-part `label | count` badge.
pub fn render_badge(label: &str, count: i64, theme: BadgeTheme) -> String {
    let (label_bg, value_bg, text_color) = theme.colors();
    let value = count.to_string();
    let label_width = text_width(label);
    let value_width = text_width(&value);
    let total_width = label_width + value_width;
    let label = escape_xml(label);

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{total}" height="{h}" role="img" aria-label="{label}: {value}">
  <title>{label}: {value}</title>
  <rect width="{lw}" height="{h}" fill="{label_bg}"/>
  <rect x="{lw}" width="{vw}" height="{h}" fill="{value_bg}"/>
  <g fill="{text_color}" text-anchor="middle" font-family="Verdana,Geneva,DejaVu Sans,sans-serif" font-size="11">
    <text x="{lx}" y="14">{label}</text>
    <text x="{vx}" y="14">{value}</text>
  </g>
</svg>"##,
        total = total_width,
        h = HEIGHT,
        lw = label_width,
        vw = value_width,
        lx = label_width / 2,
        vx = label_width + value_width / 2,
    )
}
