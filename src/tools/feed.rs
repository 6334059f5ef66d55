//! RSS/Atom feed reading.

use serde::Serialize;
use url::Url;

use crate::error_handling::ApiError;

const FAILURE: &str = "RSS parsing failed";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSummary {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    /// RFC 3339; falls back to the updated date
    pub published: Option<String>,
    pub summary: Option<String>,
}

/// Parses an RSS 0.9x/1.0/2.0, Atom or JSON Feed document.
pub fn parse_feed(bytes: &[u8]) -> Result<FeedSummary, ApiError> {
    let feed = feed_rs::parser::parse(bytes).map_err(|e| ApiError::internal(FAILURE, e))?;

    let items = feed
        .entries
        .into_iter()
        .map(|entry| FeedItem {
            title: entry.title.map(|t| t.content),
            link: entry.links.into_iter().next().map(|l| l.href),
            published: entry.published.or(entry.updated).map(|d| d.to_rfc3339()),
            summary: entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body)),
        })
        .collect();

    Ok(FeedSummary {
        title: feed.title.map(|t| t.content),
        description: feed.description.map(|d| d.content),
        link: feed.links.into_iter().next().map(|l| l.href),
        items,
    })
}

/// Downloads and parses the feed at an already validated URL.
pub async fn fetch_feed(client: &reqwest::Client, url: &Url) -> Result<FeedSummary, ApiError> {
    let bytes = async {
        client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await
    }
    .await
    .map_err(|e| ApiError::internal(FAILURE, e))?;

    parse_feed(&bytes)
}
