//! Configuration constants.
//!
//! Timeouts, cache lifetimes, and size limits used throughout the service.

use std::time::Duration;

/// Default User-Agent injected on outbound requests when the caller supplies none.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Outbound HTTP
/// Timeout for the GitHub-only proxy and the scraper
pub const GITHUB_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for the general fetch proxy
pub const GENERAL_FETCH_TIMEOUT: Duration = Duration::from_secs(15);
/// Maximum number of redirect hops to follow
pub const MAX_REDIRECT_HOPS: usize = 5;
/// Timeout for a single remote key-value command
pub const STORE_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// Retry strategy (general fetch only)
/// Backoff base; the n-th delay is `RETRY_BASE^n * RETRY_FACTOR_MS` milliseconds
pub const RETRY_BASE: u64 = 2;
/// Multiplier applied to the backoff base, giving delays of 1s, 2s, 4s
pub const RETRY_FACTOR_MS: u64 = 500;
/// Number of retries after the initial attempt
pub const RETRY_MAX_RETRIES: usize = 3;

// Cache lifetimes (seconds)
pub const REPO_CACHE_TTL_SECS: u64 = 7200;
pub const TRENDING_CACHE_TTL_SECS: u64 = 3600;
pub const USER_CACHE_TTL_SECS: u64 = 14400;

// Abuse prevention
/// One comment per source IP per minute
pub const COMMENT_RATE_LIMIT_SECS: u64 = 60;
/// One vote per (comment, source IP) per day
pub const VOTE_LOCK_SECS: u64 = 86400;
/// Hit-counter visitor dedup window
pub const HIT_DEDUP_SECS: u64 = 86400;

// Comments
/// Comments kept per page; older entries are discarded on insert
pub const MAX_COMMENTS_PER_PAGE: usize = 50;
pub const MIN_COMMENT_CHARS: usize = 2;
pub const MAX_COMMENT_CHARS: usize = 500;
pub const DEFAULT_COMMENT_AUTHOR: &str = "Anonymous";
pub const MAX_AUTHOR_CHARS: usize = 50;
/// Longest accepted page identifier
pub const MAX_PAGE_ID_CHARS: usize = 128;
/// Length of generated comment identifiers
pub const COMMENT_ID_LEN: usize = 7;

// Tools
/// Average reading speed used for text statistics
pub const READING_WORDS_PER_MINUTE: usize = 200;
pub const PASSWORD_DEFAULT_LENGTH: usize = 16;
pub const PASSWORD_MIN_LENGTH: usize = 4;
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Maximum accepted upload size for image endpoints (10MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;
