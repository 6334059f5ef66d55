//! Error handling and request statistics.
//!
//! This module provides:
//! - Error type definitions (HTTP-facing, store, fetch, initialization)
//! - Request outcome categorization
//! - Retry strategy configuration for the fetch proxy
//! - Thread-safe request statistics

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_status, get_retry_strategy};
pub use stats::RequestStats;
pub use types::{ApiError, FetchError, InitializationError, OutcomeType, StoreError};
