//! Shared handler state.

use std::sync::Arc;

use crate::config::Config;
use crate::error_handling::{InitializationError, RequestStats};
use crate::github::GithubScraper;
use crate::initialization::{init_general_client, init_github_client, init_store, init_store_client};
use crate::store::KvStore;

/// Everything a handler may need, cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KvStore>,
    /// 10s timeout; GitHub-only proxy
    pub github_client: reqwest::Client,
    /// 15s timeout; general proxy and feed reader
    pub general_client: reqwest::Client,
    pub scraper: GithubScraper,
    pub stats: Arc<RequestStats>,
}

impl AppState {
    /// Builds the HTTP clients and picks the store backend from `config`.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let store = init_store(config, init_store_client()?);
        Self::with_store(config, store)
    }

    /// Like [`AppState::from_config`] but with a caller-provided store.
    pub fn with_store(config: &Config, store: Arc<dyn KvStore>) -> Result<Self, InitializationError> {
        let github_client = init_github_client()?;
        let general_client = init_general_client()?;
        let scraper = GithubScraper::new(
            github_client.clone(),
            &config.github_base_url,
            Arc::clone(&store),
        )?;

        Ok(Self {
            store,
            github_client,
            general_client,
            scraper,
            stats: Arc::new(RequestStats::new()),
        })
    }
}
