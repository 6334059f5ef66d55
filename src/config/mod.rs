//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, TTLs, limits)
//! - HTTP header name lists used by the fetch proxy
//! - CLI/environment option types and parsing

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{Config, LogFormat, LogLevel, RunMode, StoreCredentials};
