//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line and environment
//! parsing. Every option can be supplied either as a flag or through the
//! environment (a `.env` file is loaded by the binary before parsing).

use clap::{Parser, ValueEnum};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Deployment mode.
///
/// Development always uses the in-process store, even when remote store
/// credentials are present.
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    Development,
    Production,
}

/// Connection details for the remote key-value service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreCredentials {
    pub url: String,
    pub token: String,
}

/// Service configuration.
///
/// # Examples
///
/// ```no_run
/// use ginkohub_tools::Config;
///
/// let config = Config {
///     port: 8080,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(name = "ginkohub_tools", version, about)]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Deployment mode (development forces the in-memory store)
    #[arg(long, env = "APP_ENV", value_enum, default_value = "production")]
    pub mode: RunMode,

    /// Remote key-value REST endpoint
    #[arg(long, env = "UPSTASH_REDIS_REST_URL")]
    pub store_url: Option<String>,

    /// Remote key-value REST token
    #[arg(long, env = "UPSTASH_REDIS_REST_TOKEN", hide_env_values = true)]
    pub store_token: Option<String>,

    /// Base URL used by the GitHub scraper
    #[arg(long, env = "GITHUB_BASE_URL", default_value = "https://github.com")]
    pub github_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            mode: RunMode::Production,
            store_url: None,
            store_token: None,
            github_base_url: "https://github.com".to_string(),
        }
    }
}

impl Config {
    /// Resolves remote store credentials.
    ///
    /// Explicit options (or the `UPSTASH_REDIS_REST_*` variables) win; the
    /// `KV_REST_API_URL`/`KV_REST_API_TOKEN` naming convention is accepted as a
    /// fallback. Returns `None` in development mode or when either half is missing.
    pub fn store_credentials(&self) -> Option<StoreCredentials> {
        self.store_credentials_with(|key| std::env::var(key).ok())
    }

    fn store_credentials_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<StoreCredentials> {
        if self.mode == RunMode::Development {
            return None;
        }

        let url = non_empty(self.store_url.clone()).or_else(|| non_empty(lookup("KV_REST_API_URL")))?;
        let token =
            non_empty(self.store_token.clone()).or_else(|| non_empty(lookup("KV_REST_API_TOKEN")))?;

        Some(StoreCredentials { url, token })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
