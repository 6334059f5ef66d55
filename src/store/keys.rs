//! Namespaced store keys.
//!
//! Every key is `<namespace>:<identifier>`; builders live here so the
//! namespaces are spelled in exactly one place.

use crate::utils::sanitize::sanitize_key_segment;

pub const COMMENTS: &str = "comments";
pub const RATE_LIMIT: &str = "ratelimit";
pub const VOTE_LOCK: &str = "votelock";
pub const USAGE: &str = "usage";
pub const COUNTER: &str = "counter";
pub const LOCK: &str = "lock";
pub const REPO: &str = "repo";
pub const TRENDING: &str = "trending";
pub const USER: &str = "user";

pub fn comments(page_id: &str) -> String {
    format!("{}:{}", COMMENTS, page_id)
}

/// Per-IP comment rate lock. The IP is sanitized so IPv6 colons do not
/// collide with the namespace separator.
pub fn comment_rate_limit(ip: &str) -> String {
    format!("{}:comment:{}", RATE_LIMIT, sanitize_key_segment(ip))
}

pub fn vote_lock(comment_id: &str, ip: &str) -> String {
    format!("{}:{}:{}", VOTE_LOCK, comment_id, sanitize_key_segment(ip))
}

pub fn usage(feature: &str) -> String {
    format!("{}:{}", USAGE, feature)
}

/// Pattern matching every usage counter.
pub fn usage_pattern() -> String {
    format!("{}:*", USAGE)
}

pub fn counter(id: &str) -> String {
    format!("{}:{}", COUNTER, id)
}

pub fn hit_lock(id: &str, visitor_id: &str) -> String {
    format!("{}:{}:{}", LOCK, id, sanitize_key_segment(visitor_id))
}

pub fn repo(owner: &str, repo: &str) -> String {
    format!("{}:{}/{}", REPO, owner.to_lowercase(), repo.to_lowercase())
}

pub fn trending(kind: &str, language: Option<&str>, since: &str) -> String {
    format!(
        "{}:{}:{}:{}",
        TRENDING,
        kind,
        language.unwrap_or("all").to_lowercase(),
        since
    )
}

pub fn user(username: &str) -> String {
    format!("{}:{}", USER, username.to_lowercase())
}
