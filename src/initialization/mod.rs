//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - HTTP clients (GitHub and general-purpose, with timeouts and redirect caps)
//! - Logger
//! - Key-value store backend
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;
mod store;

pub use client::{init_github_client, init_general_client, init_store_client};
pub use logger::init_logger_with;
pub use store::init_store;
