//! Shared helpers.
//!
//! - String sanitization for store keys and generated markup
//! - CSS selector parsing used by the HTML extractors

pub mod sanitize;
mod selector;

pub use selector::parse_selector_unsafe;
