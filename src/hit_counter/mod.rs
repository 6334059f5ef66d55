//! Page hit counter.
//!
//! `counter:<id>` is incremented on every hit, unless a visitor id is known:
//! then only the first hit per visitor within 24 hours counts (tracked by a
//! `lock:<id>:<visitor>` key). Store failures surface as 500s.

mod badge;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::config::HIT_DEDUP_SECS;
use crate::error_handling::ApiError;
use crate::store::{acquire_lock, keys, track_usage, KvStore};

pub use badge::{render_badge, BadgeTheme};

const MAX_COUNTER_ID_CHARS: usize = 128;
const MAX_LABEL_CHARS: usize = 50;
const DEFAULT_LABEL: &str = "views";

/// Query parameters of `GET /hit-counter/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitQuery {
    pub format: Option<String>,
    pub label: Option<String>,
    pub theme: Option<String>,
    pub uid: Option<String>,
    pub mode: Option<String>,
}

impl HitQuery {
    pub fn wants_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }

    /// Badge label, truncated; defaults to `views`.
    pub fn label(&self) -> String {
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LABEL)
            .chars()
            .take(MAX_LABEL_CHARS)
            .collect()
    }

    /// Visitor id used for deduplication.
    ///
    /// An explicit `uid` wins; `mode=unique` derives one from the client IP;
    /// otherwise there is none and every hit counts.
    pub fn visitor_id(&self, client_ip: &str) -> Option<String> {
        if let Some(uid) = self.uid.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            return Some(uid.to_string());
        }
        let unique = self
            .mode
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case("unique"));
        unique.then(|| URL_SAFE_NO_PAD.encode(client_ip))
    }
}

fn validate_counter_id(id: &str) -> Result<(), ApiError> {
    let valid = !id.is_empty()
        && id.chars().count() <= MAX_COUNTER_ID_CHARS
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ApiError::bad_request("Invalid counter id"))
    }
}

/// Registers a hit on counter `id` and returns the resulting count.
pub async fn record_hit(
    store: &dyn KvStore,
    id: &str,
    visitor_id: Option<&str>,
) -> Result<i64, ApiError> {
    const FAILURE: &str = "Failed to update counter";
    validate_counter_id(id)?;
    let counter_key = keys::counter(id);

    let first_visit = match visitor_id {
        Some(visitor) => acquire_lock(store, &keys::hit_lock(id, visitor), HIT_DEDUP_SECS)
            .await
            .map_err(|e| ApiError::internal(FAILURE, e))?,
        None => true,
    };

    let count = if first_visit {
        store
            .increment(&counter_key)
            .await
            .map_err(|e| ApiError::internal(FAILURE, e))?
    } else {
        let current = store
            .get(&counter_key)
            .await
            .map_err(|e| ApiError::internal(FAILURE, e))?;
        current
            .and_then(|v| v.as_i64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
            .unwrap_or(0)
    };

    track_usage(store, "hit_counter").await;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_support::FailingStore;

    #[tokio::test]
    async fn test_counts_every_hit_without_visitor() {
        let store = MemoryStore::new();
        for expected in 1..=3 {
            assert_eq!(record_hit(&store, "home", None).await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_dedups_per_visitor() {
        let store = MemoryStore::new();
        assert_eq!(record_hit(&store, "home", Some("alice")).await.unwrap(), 1);
        assert_eq!(record_hit(&store, "home", Some("alice")).await.unwrap(), 1);
        assert_eq!(record_hit(&store, "home", Some("bob")).await.unwrap(), 2);
        assert_eq!(record_hit(&store, "home", None).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_invalid_id() {
        let store = MemoryStore::new();
        for id in ["", "a b", "a:b", "x*"] {
            assert!(matches!(
                record_hit(&store, id, None).await,
                Err(ApiError::BadRequest(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        assert!(matches!(
            record_hit(&FailingStore, "home", None).await,
            Err(ApiError::Internal(_))
        ));
    }

    #[test]
    fn test_visitor_id_resolution() {
        let query = HitQuery::default();
        assert_eq!(query.visitor_id("1.2.3.4"), None);

        let query = HitQuery {
            mode: Some("unique".into()),
            ..Default::default()
        };
        assert_eq!(query.visitor_id("1.2.3.4").as_deref(), Some("MS4yLjMuNA"));

        let query = HitQuery {
            mode: Some("unique".into()),
            uid: Some("user-7".into()),
            ..Default::default()
        };
        assert_eq!(query.visitor_id("1.2.3.4").as_deref(), Some("user-7"));
    }

    #[test]
    fn test_label_and_format() {
        let query = HitQuery::default();
        assert_eq!(query.label(), "views");
        assert!(!query.wants_json());

        let query = HitQuery {
            label: Some("x".repeat(80)),
            format: Some("JSON".into()),
            ..Default::default()
        };
        assert_eq!(query.label().len(), MAX_LABEL_CHARS);
        assert!(query.wants_json());
    }
}
