//! Key-value store abstraction.
//!
//! Every consumer talks to the store through [`KvStore`]: `get`, `set` (with
//! optional set-if-absent and expiry), `increment`, and `list_keys`. Two
//! interchangeable backends implement it:
//! - [`MemoryStore`]: in-process map with per-write expiry timers
//! - [`RemoteStore`]: Upstash-compatible REST service
//!
//! The backend is chosen once at startup (`initialization::init_store`) and
//! handed to handlers as `Arc<dyn KvStore>`.

pub mod keys;
mod memory;
mod pattern;
mod remote;
mod usage;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error_handling::StoreError;

pub use memory::MemoryStore;
pub use pattern::pattern_to_regex;
pub use remote::RemoteStore;
pub use usage::{acquire_lock, read_usage, track_usage, UsageCounters};

/// Options for [`KvStore::set`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Only write when the key does not exist yet.
    pub if_absent: bool,
    /// Expire the key this many seconds after the write.
    pub expire_after_secs: Option<u64>,
}

impl SetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn if_absent(mut self) -> Self {
        self.if_absent = true;
        self
    }

    pub fn expire_after(mut self, secs: u64) -> Self {
        self.expire_after_secs = Some(secs);
        self
    }
}

/// Uniform interface over the store backends.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Short backend identifier reported by `/system/storage`.
    fn backend_name(&self) -> &'static str;

    /// Returns the value under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Writes `value` under `key`.
    ///
    /// Returns `false` (and leaves the stored value untouched) when
    /// `options.if_absent` is set and the key already exists.
    async fn set(&self, key: &str, value: Value, options: SetOptions) -> Result<bool, StoreError>;

    /// Adds one to the integer under `key`, treating an absent key as 0.
    async fn increment(&self, key: &str) -> Result<i64, StoreError>;

    /// Lists keys matching `pattern`, where `*` matches any run of characters.
    async fn list_keys(&self, pattern: &str) -> Result<Vec<String>, StoreError>;
}

/// Reads and deserializes a typed value.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Serializes and writes a typed value.
pub async fn set_json<T: Serialize>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
    options: SetOptions,
) -> Result<bool, StoreError> {
    let value = serde_json::to_value(value)?;
    store.set(key, value, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        stars: u32,
    }

    #[test]
    fn test_set_options_builder() {
        let options = SetOptions::new().if_absent().expire_after(60);
        assert!(options.if_absent);
        assert_eq!(options.expire_after_secs, Some(60));
        assert_eq!(SetOptions::new(), SetOptions::default());
    }

    #[tokio::test]
    async fn test_typed_helpers() {
        let store = MemoryStore::new();
        let sample = Sample {
            name: "ginko".into(),
            stars: 42,
        };
        assert!(set_json(&store, "repo:a/b", &sample, SetOptions::new())
            .await
            .unwrap());
        let loaded: Option<Sample> = get_json(&store, "repo:a/b").await.unwrap();
        assert_eq!(loaded, Some(sample));

        let missing: Option<Sample> = get_json(&store, "repo:x/y").await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_get_json_type_mismatch_is_error() {
        let store = MemoryStore::new();
        store
            .set("repo:a/b", Value::from(5), SetOptions::new())
            .await
            .unwrap();
        let loaded: Result<Option<Sample>, _> = get_json(&store, "repo:a/b").await;
        assert!(matches!(loaded, Err(StoreError::Serialization(_))));
    }
}
