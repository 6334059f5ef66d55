//! In-process store backend.
//!
//! A mutex-guarded map. Writes with an expiry schedule a single-shot deletion
//! task; reads also treat an elapsed expiry as absent so a late timer never
//! exposes a stale value. Nothing survives a restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use super::pattern::pattern_to_regex;
use super::{KvStore, SetOptions};
use crate::error_handling::StoreError;

#[derive(Debug)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
    /// Write generation, so an expiry timer only removes the write that scheduled it
    generation: u64,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    next_generation: u64,
}

/// In-memory [`KvStore`] implementation.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // No await happens while the guard is held, so a std mutex is enough and
    // check-and-set runs as one step relative to other requests.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn schedule_expiry(&self, key: String, generation: u64, ttl: Duration) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
            if guard
                .entries
                .get(&key)
                .is_some_and(|entry| entry.generation == generation)
            {
                guard.entries.remove(&key);
                log::trace!("Expired in-memory key {}", key);
            }
        });
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let now = Instant::now();
        let guard = self.lock();
        Ok(guard
            .entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: Value, options: SetOptions) -> Result<bool, StoreError> {
        let now = Instant::now();
        let generation = {
            let mut guard = self.lock();
            let exists = guard
                .entries
                .get(key)
                .is_some_and(|entry| entry.is_live(now));
            if options.if_absent && exists {
                return Ok(false);
            }

            guard.next_generation += 1;
            let generation = guard.next_generation;
            let expires_at = options
                .expire_after_secs
                .map(|secs| now + Duration::from_secs(secs));
            guard.entries.insert(
                key.to_string(),
                Entry {
                    value,
                    expires_at,
                    generation,
                },
            );
            generation
        };

        if let Some(secs) = options.expire_after_secs {
            self.schedule_expiry(key.to_string(), generation, Duration::from_secs(secs));
        }
        Ok(true)
    }

    async fn increment(&self, key: &str) -> Result<i64, StoreError> {
        let now = Instant::now();
        let mut guard = self.lock();
        guard.next_generation += 1;
        let generation = guard.next_generation;

        match guard.entries.get_mut(key).filter(|entry| entry.is_live(now)) {
            Some(entry) => {
                let current = entry
                    .value
                    .as_i64()
                    .ok_or_else(|| StoreError::NotAnInteger(key.to_string()))?;
                let next = current + 1;
                // Keep the existing expiry, like INCR does.
                entry.value = Value::from(next);
                Ok(next)
            }
            None => {
                guard.entries.insert(
                    key.to_string(),
                    Entry {
                        value: Value::from(1),
                        expires_at: None,
                        generation,
                    },
                );
                Ok(1)
            }
        }
    }

    async fn list_keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let re = pattern_to_regex(pattern).map_err(|e| StoreError::Backend(e.to_string()))?;
        let now = Instant::now();
        let guard = self.lock();
        let mut keys: Vec<String> = guard
            .entries
            .iter()
            .filter(|(key, entry)| entry.is_live(now) && re.is_match(key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}
