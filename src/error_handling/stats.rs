//! Request statistics tracking.
//!
//! Counts every response by outcome bucket so `/system/stats` can report
//! process-local traffic alongside the persistent usage counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use axum::http::StatusCode;
use strum::IntoEnumIterator;

use super::categorization::categorize_status;
use super::types::OutcomeType;

/// Thread-safe request statistics tracker.
///
/// All outcome buckets are initialized to zero on creation, so the map is
/// never written after construction and only atomics are touched per request.
pub struct RequestStats {
    outcomes: HashMap<OutcomeType, AtomicUsize>,
    total: AtomicUsize,
    started: Instant,
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStats {
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for outcome in OutcomeType::iter() {
            outcomes.insert(outcome, AtomicUsize::new(0));
        }

        RequestStats {
            outcomes,
            total: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    /// Records one response.
    pub fn record(&self, status: StatusCode) {
        self.total.fetch_add(1, Ordering::Relaxed);
        let outcome = categorize_status(status);
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Outcome {:?} missing from stats map. This indicates a bug in RequestStats initialization.",
                outcome
            );
        }
    }

    pub fn get_count(&self, outcome: OutcomeType) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn total_requests(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn total_failures(&self) -> usize {
        OutcomeType::iter()
            .filter(OutcomeType::is_failure)
            .map(|o| self.get_count(o))
            .sum()
    }

    /// Seconds since the tracker (and therefore the server) started.
    pub fn uptime_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Snapshot of every bucket keyed by its string name.
    pub fn snapshot(&self) -> HashMap<&'static str, usize> {
        OutcomeType::iter()
            .map(|o| (o.as_str(), self.get_count(o)))
            .collect()
    }
}
