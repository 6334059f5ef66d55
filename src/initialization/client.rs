//! HTTP client initialization.
//!
//! Clients are built once at startup and shared through the application state.
//! None of them turn HTTP error statuses into errors; callers decide what a
//! 4xx/5xx means.

use std::time::Duration;

use reqwest::{redirect, ClientBuilder};

use crate::config::{
    DEFAULT_USER_AGENT, GENERAL_FETCH_TIMEOUT, GITHUB_FETCH_TIMEOUT, MAX_REDIRECT_HOPS,
    STORE_REQUEST_TIMEOUT,
};

fn builder(timeout: Duration) -> ClientBuilder {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(redirect::Policy::limited(MAX_REDIRECT_HOPS))
        .user_agent(DEFAULT_USER_AGENT)
}

/// Initializes the client used for GitHub scraping and the GitHub-only proxy.
///
/// 10 second connect and response timeout, at most 5 redirects.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_github_client() -> Result<reqwest::Client, reqwest::Error> {
    builder(GITHUB_FETCH_TIMEOUT).build()
}

/// Initializes the client used by the general fetch proxy and the feed reader.
///
/// 15 second connect and response timeout, at most 5 redirects.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_general_client() -> Result<reqwest::Client, reqwest::Error> {
    builder(GENERAL_FETCH_TIMEOUT).build()
}

/// Initializes the client used to talk to the remote key-value service.
pub fn init_store_client() -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(STORE_REQUEST_TIMEOUT)
        .redirect(redirect::Policy::none())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clients_build() {
        assert!(init_github_client().is_ok());
        assert!(init_general_client().is_ok());
        assert!(init_store_client().is_ok());
    }
}
