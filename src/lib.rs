//! ginkohub_tools library: the GinkoHub Tools HTTP API
//!
//! A small toolbox served over HTTP:
//! - a general fetch proxy (header layering, retry with backoff, raw/json/meta output)
//! - a cached GitHub scraper (repositories, trending, users)
//! - a comment board with voting and a hit counter
//! - stateless utilities (units, text, base64, passwords, JSON, QR, RSS, markdown, images)
//!
//! Shared state lives behind [`store::KvStore`], either in process or in a
//! remote Upstash-compatible REST store.
//!
//! # Example
//!
//! ```no_run
//! use ginkohub_tools::{run_server, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), anyhow::Error> {
//! let config = Config {
//!     port: 8080,
//!     ..Default::default()
//! };
//! run_server(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod comments;
pub mod config;
pub mod error_handling;
pub mod fetch;
pub mod github;
pub mod hit_counter;
pub mod images;
pub mod initialization;
pub mod parse;
pub mod security;
pub mod server;
pub mod store;
pub mod system;
pub mod tools;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, RunMode};
pub use error_handling::ApiError;
pub use server::{build_router, run_server, AppState};
