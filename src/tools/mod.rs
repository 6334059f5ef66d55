//! Stateless utility tools.
//!
//! Each tool is a plain function of its input; the HTTP handlers add usage
//! tracking around them.

pub mod encoding;
pub mod feed;
pub mod json;
pub mod markdown;
pub mod password;
pub mod qr;
pub mod text;
pub mod units;
