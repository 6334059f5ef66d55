//! Comment board and voting.
//!
//! Comments for a page are stored as one list (newest first, capped) under
//! `comments:<page>`. Posting and voting are read-modify-write on that list
//! without a version check, so two writers racing on the same page can lose
//! one update.
//!
//! Store failures here are never swallowed: the rate lock, the vote lock and
//! the list itself decide what the caller sees, so they surface as 500s.

mod render;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

use crate::config::{
    COMMENT_ID_LEN, COMMENT_RATE_LIMIT_SECS, MAX_COMMENTS_PER_PAGE, MAX_COMMENT_CHARS,
    MAX_PAGE_ID_CHARS, MIN_COMMENT_CHARS, VOTE_LOCK_SECS,
};
use crate::error_handling::ApiError;
use crate::store::{acquire_lock, get_json, keys, set_json, track_usage, KvStore, SetOptions};

pub use render::{clean_author, render_comment};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    /// Sanitized HTML
    pub content: String,
    pub timestamp: DateTime<Utc>,
    // Comments written before voting existed have no counters.
    #[serde(default)]
    pub ups: u64,
    #[serde(default)]
    pub downs: u64,
}

/// Body of `POST /comments/{page_id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComment {
    pub author: Option<String>,
    pub content: Option<String>,
}

/// Body of `POST /comments/{page_id}/{comment_id}/vote`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum VoteKind {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub ups: u64,
    pub downs: u64,
}

fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..COMMENT_ID_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

fn validate_page_id(page_id: &str) -> Result<(), ApiError> {
    let length = page_id.chars().count();
    if page_id.trim().is_empty() || length > MAX_PAGE_ID_CHARS {
        return Err(ApiError::bad_request("Invalid page id"));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), ApiError> {
    let trimmed = content.trim().chars().count();
    let raw = content.chars().count();
    if trimmed < MIN_COMMENT_CHARS || raw > MAX_COMMENT_CHARS {
        return Err(ApiError::bad_request(format!(
            "Comment must be between {} and {} characters",
            MIN_COMMENT_CHARS, MAX_COMMENT_CHARS
        )));
    }
    Ok(())
}

async fn load(store: &dyn KvStore, page_id: &str, failure: &str) -> Result<Vec<Comment>, ApiError> {
    get_json::<Vec<Comment>>(store, &keys::comments(page_id))
        .await
        .map(Option::unwrap_or_default)
        .map_err(|e| ApiError::internal(failure, e))
}

async fn save(
    store: &dyn KvStore,
    page_id: &str,
    comments: &[Comment],
    failure: &str,
) -> Result<(), ApiError> {
    set_json(store, &keys::comments(page_id), &comments, SetOptions::new())
        .await
        .map(|_| ())
        .map_err(|e| ApiError::internal(failure, e))
}

/// Comments for `page_id`, newest first. A page nobody commented on yields
/// an empty list.
pub async fn list_comments(store: &dyn KvStore, page_id: &str) -> Result<Vec<Comment>, ApiError> {
    validate_page_id(page_id)?;
    load(store, page_id, "Failed to load comments").await
}

/// Posts a comment from `client_ip` to `page_id`.
///
/// # Errors
///
/// - 400 when the content is shorter than 2 characters after trimming or
///   longer than 500 characters
/// - 429 when the same IP posted within the last minute
/// - 500 when the store fails
///
/// The rate lock is taken only once the page has loaded, so a failed read
/// leaves the caller free to retry. A failed final write still holds the
/// lock until it expires.
pub async fn post_comment(
    store: &dyn KvStore,
    page_id: &str,
    client_ip: &str,
    input: NewComment,
) -> Result<Comment, ApiError> {
    const FAILURE: &str = "Failed to post comment";

    validate_page_id(page_id)?;
    let content = input.content.unwrap_or_default();
    validate_content(&content)?;

    let mut comments = load(store, page_id, FAILURE).await?;

    let rate_key = keys::comment_rate_limit(client_ip);
    let acquired = acquire_lock(store, &rate_key, COMMENT_RATE_LIMIT_SECS)
        .await
        .map_err(|e| ApiError::internal(FAILURE, e))?;
    if !acquired {
        log::debug!("Comment rate limit hit for {}", rate_key);
        return Err(ApiError::TooManyRequests(
            "Too many comments, please wait a minute".to_string(),
        ));
    }

    let comment = Comment {
        id: generate_id(),
        author: clean_author(input.author.as_deref()),
        content: render_comment(&content),
        timestamp: Utc::now(),
        ups: 0,
        downs: 0,
    };

    comments.insert(0, comment.clone());
    comments.truncate(MAX_COMMENTS_PER_PAGE);
    save(store, page_id, &comments, FAILURE).await?;

    track_usage(store, "comments").await;
    log::info!("New comment {} on page {}", comment.id, page_id);
    Ok(comment)
}

fn not_found() -> ApiError {
    ApiError::NotFound("Comment not found".to_string())
}

/// Records an up or down vote from `client_ip` on one comment.
///
/// The comment must exist before the 24 hour lock is taken, so a vote aimed
/// at the wrong page never blocks the real one.
///
/// # Errors
///
/// - 400 for a vote type other than `up`/`down`
/// - 403 when this IP already voted on this comment within 24 hours
/// - 404 when the comment does not exist on the page
/// - 500 when the store fails
pub async fn vote(
    store: &dyn KvStore,
    page_id: &str,
    comment_id: &str,
    client_ip: &str,
    request: VoteRequest,
) -> Result<VoteTally, ApiError> {
    const FAILURE: &str = "Failed to record vote";

    validate_page_id(page_id)?;
    let kind: VoteKind = request
        .kind
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| ApiError::bad_request("Vote type must be 'up' or 'down'"))?;

    if !load(store, page_id, FAILURE)
        .await?
        .iter()
        .any(|c| c.id == comment_id)
    {
        return Err(not_found());
    }

    let lock_key = keys::vote_lock(comment_id, client_ip);
    let acquired = acquire_lock(store, &lock_key, VOTE_LOCK_SECS)
        .await
        .map_err(|e| ApiError::internal(FAILURE, e))?;
    if !acquired {
        return Err(ApiError::Forbidden(
            "You have already voted on this comment".to_string(),
        ));
    }

    // Re-read so the increment applies to the freshest list.
    let mut comments = load(store, page_id, FAILURE).await?;
    let comment = comments
        .iter_mut()
        .find(|c| c.id == comment_id)
        .ok_or_else(not_found)?;

    match kind {
        VoteKind::Up => comment.ups += 1,
        VoteKind::Down => comment.downs += 1,
    }
    let tally = VoteTally {
        ups: comment.ups,
        downs: comment.downs,
    };

    save(store, page_id, &comments, FAILURE).await?;
    track_usage(store, "votes").await;
    Ok(tally)
}
