//! Key-value store selection.

use std::sync::Arc;

use crate::config::Config;
use crate::store::{KvStore, MemoryStore, RemoteStore};

/// Picks the store backend for this process.
///
/// The remote REST store is used when both halves of its credentials are
/// configured and the service is not running in development mode; otherwise
/// the in-memory store. Callers only ever see `dyn KvStore`.
pub fn init_store(config: &Config, client: reqwest::Client) -> Arc<dyn KvStore> {
    match config.store_credentials() {
        Some(credentials) => {
            log::info!("Using remote key-value store at {}", credentials.url);
            Arc::new(RemoteStore::new(client, credentials))
        }
        None => {
            log::info!("Using in-memory key-value store (state is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    }
}
