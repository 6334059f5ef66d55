//! Usage counters and locks built on the store primitives.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::{keys, KvStore, SetOptions};
use crate::error_handling::StoreError;

/// Bumps `usage:total` and `usage:<feature>`.
///
/// Best effort: a store failure is logged and discarded, never retried, and
/// never affects the caller's response.
pub async fn track_usage(store: &dyn KvStore, feature: &str) {
    for key in [keys::usage("total"), keys::usage(feature)] {
        if let Err(e) = store.increment(&key).await {
            log::debug!("Usage counter {} not updated: {}", key, e);
        }
    }
}

/// Takes a lock that blocks competing callers until `ttl_secs` elapse.
///
/// Returns `Ok(true)` if this caller took the lock and `Ok(false)` if it was
/// already held. There is no release; the lock simply expires.
pub async fn acquire_lock(store: &dyn KvStore, key: &str, ttl_secs: u64) -> Result<bool, StoreError> {
    store
        .set(
            key,
            Value::from("1"),
            SetOptions::new().if_absent().expire_after(ttl_secs),
        )
        .await
}

/// Snapshot of the usage counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageCounters {
    /// Per-feature counts, keyed by feature name (without the namespace)
    pub counters: BTreeMap<String, i64>,
    /// Value of `usage:total`
    pub total: i64,
}

/// Reads every `usage:*` counter.
///
/// Entries that are not integers are skipped.
pub async fn read_usage(store: &dyn KvStore) -> Result<UsageCounters, StoreError> {
    let prefix = format!("{}:", keys::USAGE);
    let mut usage = UsageCounters::default();

    for key in store.list_keys(&keys::usage_pattern()).await? {
        let Some(count) = store.get(&key).await?.as_ref().and_then(as_count) else {
            continue;
        };
        let feature = key.strip_prefix(&prefix).unwrap_or(&key);
        if feature == "total" {
            usage.total = count;
        } else {
            usage.counters.insert(feature.to_string(), count);
        }
    }
    Ok(usage)
}

fn as_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_support::FailingStore;

    #[tokio::test]
    async fn test_track_usage_increments_total_and_feature() {
        let store = MemoryStore::new();
        track_usage(&store, "comments").await;
        track_usage(&store, "comments").await;
        track_usage(&store, "qr").await;

        assert_eq!(store.get("usage:total").await.unwrap(), Some(Value::from(3)));
        assert_eq!(
            store.get("usage:comments").await.unwrap(),
            Some(Value::from(2))
        );
        assert_eq!(store.get("usage:qr").await.unwrap(), Some(Value::from(1)));
    }

    #[tokio::test]
    async fn test_track_usage_swallows_failures() {
        // Must simply return.
        track_usage(&FailingStore, "comments").await;
    }

    #[tokio::test]
    async fn test_read_usage() {
        let store = MemoryStore::new();
        track_usage(&store, "qr").await;
        track_usage(&store, "qr").await;
        track_usage(&store, "fetch").await;
        store
            .set("usage:broken", Value::from("n/a"), SetOptions::new())
            .await
            .unwrap();

        let usage = read_usage(&store).await.unwrap();
        assert_eq!(usage.total, 3);
        assert_eq!(usage.counters.get("qr"), Some(&2));
        assert_eq!(usage.counters.get("fetch"), Some(&1));
        assert!(!usage.counters.contains_key("broken"));
        assert!(!usage.counters.contains_key("total"));
    }

    #[tokio::test]
    async fn test_read_usage_propagates_failures() {
        assert!(read_usage(&FailingStore).await.is_err());
    }

    #[tokio::test]
    async fn test_acquire_lock_once() {
        let store = MemoryStore::new();
        assert!(acquire_lock(&store, "lock:home:v1", 86400).await.unwrap());
        assert!(!acquire_lock(&store, "lock:home:v1", 86400).await.unwrap());
        assert!(acquire_lock(&store, "lock:home:v2", 86400).await.unwrap());
    }

    #[tokio::test]
    async fn test_acquire_lock_propagates_failures() {
        assert!(acquire_lock(&FailingStore, "lock:home:v1", 60).await.is_err());
    }
}
