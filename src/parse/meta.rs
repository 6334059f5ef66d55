//! Page metadata extraction.
//!
//! Each field is resolved from an ordered list of candidates; the first
//! non-empty one wins. URLs found in the page are resolved against the URL the
//! page was requested from.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::Serialize;
use url::Url;

use crate::utils::parse_selector_unsafe;

static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("meta[content]", "page meta tags"));
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("title", "page title"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("link[rel][href]", "page links"));

/// Metadata returned by the `meta` output mode of the fetch proxy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub url: String,
    pub site_name: String,
    pub favicon: String,
}

/// Extracts metadata from `html`, resolving relative URLs against `base`.
///
/// Precedence per field:
/// - title: `og:title`, `twitter:title`, `<title>`
/// - description: `og:description`, `twitter:description`, `description`
/// - image: `og:image`, `twitter:image`, `twitter:image:src`
/// - url: `og:url`, `<link rel="canonical">`, `base`
/// - site_name: `og:site_name`, `application-name`, host of `base`
/// - favicon: `<link rel="icon">` (any rel containing `icon`), `apple-touch-icon`, `/favicon.ico`
pub fn extract_page_meta(html: &str, base: &Url) -> PageMeta {
    let document = Html::parse_document(html);

    let title = first_meta(&document, &["og:title", "twitter:title"]).or_else(|| {
        document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    });

    let description = first_meta(
        &document,
        &["og:description", "twitter:description", "description"],
    );

    let image = first_meta(&document, &["og:image", "twitter:image", "twitter:image:src"])
        .map(|src| resolve(base, &src));

    let url = first_meta(&document, &["og:url"])
        .or_else(|| first_link(&document, |rel| rel == "canonical"))
        .map(|href| resolve(base, &href))
        .unwrap_or_else(|| base.to_string());

    let site_name = first_meta(&document, &["og:site_name", "application-name"])
        .unwrap_or_else(|| base.host_str().unwrap_or_default().to_string());

    let favicon = first_link(&document, |rel| rel == "icon" || rel == "shortcut")
        .or_else(|| first_link(&document, |rel| rel == "apple-touch-icon"))
        .map(|href| resolve(base, &href))
        .unwrap_or_else(|| resolve(base, "/favicon.ico"));

    PageMeta {
        title,
        description,
        image,
        url,
        site_name,
        favicon,
    }
}

/// Value of the first `<meta>` whose `property` or `name` matches one of
/// `keys`, trying keys in order.
fn first_meta(document: &Html, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        document.select(&META_SELECTOR).find_map(|el| {
            let matches = ["property", "name"]
                .iter()
                .filter_map(|attr| el.value().attr(attr))
                .any(|name| name.trim().eq_ignore_ascii_case(key));
            if !matches {
                return None;
            }
            non_empty(el.value().attr("content"))
        })
    })
}

/// `href` of the first `<link>` with a `rel` token accepted by `want`.
fn first_link(document: &Html, want: impl Fn(&str) -> bool) -> Option<String> {
    document
        .select(&LINK_SELECTOR)
        .filter(|el| {
            el.value()
                .attr("rel")
                .unwrap_or_default()
                .split_ascii_whitespace()
                .any(|token| want(&token.to_ascii_lowercase()))
        })
        .find_map(|el| non_empty(el.value().attr("href")))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn resolve(base: &Url, href: &str) -> String {
    base.join(href)
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}
