//! GitHub scraper.
//!
//! Each lookup is read-through cached in the key-value store under a
//! deterministic key with a fixed lifetime. Cache reads and writes are best
//! effort: a failing store only means the page is scraped every time. A failed
//! scrape is reported with a fixed message; the cause is only logged.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};
use url::Url;

use crate::config::{REPO_CACHE_TTL_SECS, TRENDING_CACHE_TTL_SECS, USER_CACHE_TTL_SECS};
use crate::error_handling::{ApiError, InitializationError};
use crate::parse::github::{
    parse_repo, parse_trending_developers, parse_trending_repos, parse_user, RepoInfo,
    TrendingDeveloper, TrendingRepo, UserProfile,
};
use crate::store::{get_json, keys, set_json, track_usage, KvStore, SetOptions};

/// GitHub owner, repository and user names.
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]{1,100}$").unwrap_or_else(|e| {
        panic!("Invalid GitHub name pattern: {}. This is a programming error.", e)
    })
});

/// Trending time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TrendingSince {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

/// Scrapes GitHub pages and caches the parsed results.
#[derive(Clone)]
pub struct GithubScraper {
    client: reqwest::Client,
    base: Url,
    store: Arc<dyn KvStore>,
}

impl GithubScraper {
    /// Creates a scraper for the GitHub instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::ConfigError` if `base_url` is not an
    /// absolute http(s) URL.
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        store: Arc<dyn KvStore>,
    ) -> Result<Self, InitializationError> {
        let base = Url::parse(base_url)
            .map_err(|e| InitializationError::ConfigError(format!("GitHub base URL: {}", e)))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(InitializationError::ConfigError(format!(
                "GitHub base URL must be an http(s) URL, got {}",
                base_url
            )));
        }
        Ok(Self {
            client,
            base,
            store,
        })
    }

    /// Repository description, stars, forks and topics.
    pub async fn repo(&self, owner: &str, repo: &str) -> Result<RepoInfo, ApiError> {
        validate_name(owner, "owner")?;
        validate_name(repo, "repository")?;
        const FAILURE: &str = "Failed to fetch repo stats";

        let page_url = self.page_url(&[owner, repo], None, FAILURE)?;
        self.cached(
            &keys::repo(owner, repo),
            REPO_CACHE_TTL_SECS,
            "github_repo",
            FAILURE,
            &page_url,
            |html| parse_repo(html, owner, repo, &page_url),
        )
        .await
    }

    /// Trending repositories, optionally for one language.
    pub async fn trending_repos(
        &self,
        language: Option<&str>,
        since: TrendingSince,
    ) -> Result<Vec<TrendingRepo>, ApiError> {
        const FAILURE: &str = "Failed to fetch trending repositories";

        let mut segments = vec!["trending"];
        segments.extend(language);
        let page_url = self.page_url(&segments, Some(since), FAILURE)?;
        let base = self.base.clone();
        self.cached(
            &keys::trending("repos", language, since.as_ref()),
            TRENDING_CACHE_TTL_SECS,
            "github_trending",
            FAILURE,
            &page_url,
            |html| parse_trending_repos(html, &base),
        )
        .await
    }

    /// Trending developers, optionally for one language.
    pub async fn trending_developers(
        &self,
        language: Option<&str>,
        since: TrendingSince,
    ) -> Result<Vec<TrendingDeveloper>, ApiError> {
        const FAILURE: &str = "Failed to fetch trending developers";

        let mut segments = vec!["trending", "developers"];
        segments.extend(language);
        let page_url = self.page_url(&segments, Some(since), FAILURE)?;
        let base = self.base.clone();
        self.cached(
            &keys::trending("developers", language, since.as_ref()),
            TRENDING_CACHE_TTL_SECS,
            "github_developers",
            FAILURE,
            &page_url,
            |html| parse_trending_developers(html, &base),
        )
        .await
    }

    /// Public profile of `username`.
    pub async fn user(&self, username: &str) -> Result<UserProfile, ApiError> {
        validate_name(username, "username")?;
        const FAILURE: &str = "Failed to fetch user profile";

        let page_url = self.page_url(&[username], None, FAILURE)?;
        self.cached(
            &keys::user(username),
            USER_CACHE_TTL_SECS,
            "github_user",
            FAILURE,
            &page_url,
            |html| parse_user(html, username, &page_url),
        )
        .await
    }

    fn page_url(
        &self,
        segments: &[&str],
        since: Option<TrendingSince>,
        failure: &str,
    ) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::internal(failure, "base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        if let Some(since) = since {
            url.query_pairs_mut().append_pair("since", since.as_ref());
        }
        Ok(url)
    }

    async fn cached<T, F>(
        &self,
        key: &str,
        ttl_secs: u64,
        feature: &str,
        failure: &str,
        page_url: &Url,
        parse: F,
    ) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&str) -> T,
    {
        let store = self.store.as_ref();

        match get_json::<T>(store, key).await {
            Ok(Some(hit)) => {
                log::debug!("Cache hit for {}", key);
                track_usage(store, feature).await;
                return Ok(hit);
            }
            Ok(None) => {}
            Err(e) => log::warn!("Cache read for {} failed, scraping instead: {}", key, e),
        }

        let html = self
            .fetch_page(page_url)
            .await
            .map_err(|e| ApiError::internal(failure, e))?;
        let parsed = parse(&html);

        let options = SetOptions::new().expire_after(ttl_secs);
        if let Err(e) = set_json(store, key, &parsed, options).await {
            log::warn!("Cache write for {} failed: {}", key, e);
        }
        track_usage(store, feature).await;
        Ok(parsed)
    }

    async fn fetch_page(&self, url: &Url) -> Result<String, reqwest::Error> {
        log::debug!("Scraping {}", url);
        self.client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

fn validate_name(value: &str, what: &str) -> Result<(), ApiError> {
    if NAME_PATTERN.is_match(value) && value != "." && value != ".." {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!("Invalid {} name", what)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_support::FailingStore;
    use serde_json::Value;
    use std::str::FromStr;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const REPO_PAGE: &str = r#"<p class="f4 my-3">Demo repo</p>
        <span id="repo-stars-counter-star" title="1,234">1.2k</span>"#;

    fn scraper(server: &MockServer, store: Arc<dyn KvStore>) -> GithubScraper {
        GithubScraper::new(reqwest::Client::new(), &server.uri(), store).unwrap()
    }

    #[test]
    fn test_since_parsing() {
        assert_eq!(TrendingSince::from_str("weekly").unwrap(), TrendingSince::Weekly);
        assert_eq!(TrendingSince::from_str("MONTHLY").unwrap(), TrendingSince::Monthly);
        assert!(TrendingSince::from_str("yearly").is_err());
        assert_eq!(TrendingSince::default().as_ref(), "daily");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        assert!(GithubScraper::new(reqwest::Client::new(), "not a url", store.clone()).is_err());
        assert!(GithubScraper::new(reqwest::Client::new(), "ftp://github.com", store).is_err());
    }

    #[tokio::test]
    async fn test_repo_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/octo/demo"))
            .respond_with(ResponseTemplate::new(200).set_body_string(REPO_PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let scraper = scraper(&server, store.clone());

        let first = scraper.repo("octo", "demo").await.unwrap();
        let second = scraper.repo("Octo", "Demo").await.unwrap();
        assert_eq!(first.stars, "1234");
        assert_eq!(first.description, "Demo repo");
        assert_eq!(second, first);

        assert!(store.get("repo:octo/demo").await.unwrap().is_some());
        assert_eq!(
            store.get("usage:github_repo").await.unwrap(),
            Some(Value::from(2))
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_has_fixed_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let scraper = scraper(&server, Arc::new(MemoryStore::new()));
        let err = scraper.repo("octo", "missing").await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.to_string(), "Failed to fetch repo stats");
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/octo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<span class="p-name">Octo Cat</span>"#),
            )
            .expect(2)
            .mount(&server)
            .await;

        let scraper = scraper(&server, Arc::new(FailingStore));
        assert_eq!(scraper.user("octo").await.unwrap().name, "Octo Cat");
        assert_eq!(scraper.user("octo").await.unwrap().name, "Octo Cat");
    }

    #[tokio::test]
    async fn test_trending_url_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending/rust"))
            .and(query_param("since", "weekly"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<article class="Box-row"><h2><a href="/a/b">a / b</a></h2></article>"#,
            ))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let scraper = scraper(&server, store.clone());
        let repos = scraper
            .trending_repos(Some("rust"), TrendingSince::Weekly)
            .await
            .unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].url, format!("{}/a/b", server.uri()));
        assert!(store
            .get("trending:repos:rust:weekly")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_trending_developers_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending/developers"))
            .and(query_param("since", "daily"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let scraper = scraper(&server, Arc::new(MemoryStore::new()));
        let devs = scraper
            .trending_developers(None, TrendingSince::Daily)
            .await
            .unwrap();
        assert!(devs.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_names_rejected_before_fetch() {
        let server = MockServer::start().await;
        let scraper = scraper(&server, Arc::new(MemoryStore::new()));
        for (owner, repo) in [("..", "x"), ("a b", "x"), ("ok", "")] {
            let err = scraper.repo(owner, repo).await.unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "{}/{}", owner, repo);
        }
    }
}
