//! Outcome categorization and retry strategy.

use std::time::Duration;

use axum::http::StatusCode;
use tokio_retry::strategy::ExponentialBackoff;

use super::types::OutcomeType;
use crate::config::{RETRY_BASE, RETRY_FACTOR_MS, RETRY_MAX_RETRIES};

/// Creates the exponential backoff used by the general fetch proxy.
///
/// `ExponentialBackoff` yields `base^n * factor` milliseconds, so a base of 2
/// with a factor of 500 gives 1s, 2s, 4s. The iterator is limited to
/// `RETRY_MAX_RETRIES` delays, i.e. one initial attempt plus three retries.
pub fn get_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(RETRY_BASE)
        .factor(RETRY_FACTOR_MS)
        .take(RETRY_MAX_RETRIES)
}

/// Maps a response status onto an `OutcomeType` bucket.
pub fn categorize_status(status: StatusCode) -> OutcomeType {
    match status.as_u16() {
        400 => OutcomeType::BadRequest,
        403 => OutcomeType::Forbidden,
        404 => OutcomeType::NotFound,
        429 => OutcomeType::RateLimited,
        502 | 503 | 504 => OutcomeType::UpstreamError,
        _ if status.is_server_error() => OutcomeType::InternalError,
        _ if status.is_client_error() => OutcomeType::OtherClientError,
        _ if status.is_redirection() => OutcomeType::Redirect,
        _ => OutcomeType::Success,
    }
}
