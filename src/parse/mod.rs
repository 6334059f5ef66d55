//! HTML parsing and data extraction.
//!
//! This module extracts structured data from HTML content:
//! - Page metadata (Open Graph, Twitter Cards, standard tags) for the fetch proxy
//! - Repository, trending and profile fields from GitHub pages
//!
//! All parsing is done using CSS selectors via the `scraper` crate.

pub mod github;
mod meta;

pub use meta::{extract_page_meta, PageMeta};
