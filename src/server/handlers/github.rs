//! GitHub routes: scraper lookups, the GitHub-only proxy and usage stats.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::error_handling::{ApiError, FetchError};
use crate::fetch::{fetch_once, render, OutboundRequest, OutputFormat};
use crate::github::TrendingSince;
use crate::parse::github::{RepoInfo, TrendingDeveloper, TrendingRepo, UserProfile};
use crate::security::validate_github_url;
use crate::server::AppState;
use crate::store::{read_usage, track_usage, UsageCounters};

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub language: Option<String>,
    pub since: Option<String>,
}

impl TrendingQuery {
    fn language(&self) -> Option<&str> {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    fn since(&self) -> Result<TrendingSince, ApiError> {
        match self.since.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(TrendingSince::default()),
            Some(raw) => raw.parse().map_err(|_| {
                ApiError::bad_request("since must be one of daily, weekly, monthly")
            }),
        }
    }
}

/// `GET /github/fetch?url=`: single attempt, raw passthrough.
pub async fn github_fetch(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let target = validate_github_url(query.url.as_deref())?;
    let request =
        OutboundRequest::from_inbound(Method::GET, target.clone(), &headers, None, Bytes::new());

    let upstream = fetch_once(&state.github_client, &request)
        .await
        .map_err(|e| match e {
            FetchError::Transport(e) => {
                log::warn!("GitHub fetch failed: {}", e);
                ApiError::BadGateway("Failed to fetch url".to_string())
            }
            other => other.into(),
        })?;

    track_usage(state.store.as_ref(), "github_fetch").await;
    Ok(render(upstream, OutputFormat::Raw, &target))
}

/// `GET /github/repo/{owner}/{repo}`
pub async fn repo(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> Result<Json<RepoInfo>, ApiError> {
    state.scraper.repo(&owner, &repo).await.map(Json)
}

/// `GET /github/trending?language=&since=`
pub async fn trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<Vec<TrendingRepo>>, ApiError> {
    let since = query.since()?;
    state
        .scraper
        .trending_repos(query.language(), since)
        .await
        .map(Json)
}

/// `GET /github/trending/developers?language=&since=`
pub async fn trending_developers(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<Vec<TrendingDeveloper>>, ApiError> {
    let since = query.since()?;
    state
        .scraper
        .trending_developers(query.language(), since)
        .await
        .map(Json)
}

/// `GET /github/user/{username}`
pub async fn user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    state.scraper.user(&username).await.map(Json)
}

/// `GET /github/stats`
pub async fn stats(State(state): State<AppState>) -> Result<Json<UsageCounters>, ApiError> {
    read_usage(state.store.as_ref())
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch stats", e))
}
