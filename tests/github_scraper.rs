//! GitHub routes against a mock GitHub.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{encode, get, test_app, test_app_with_github};
use ginkohub_tools::store::KvStore;

const REPO_PAGE: &str = r#"<html><body>
    <p class="f4 my-3">Fast web framework</p>
    <span id="repo-stars-counter-star" title="1,234">1.2k</span>
    <span id="repo-network-counter" title="56">56</span>
    <a class="topic-tag topic-tag-link">http</a>
    <span itemprop="programmingLanguage">Rust</span>
</body></html>"#;

const TRENDING_PAGE: &str = r#"<html><body>
    <article class="Box-row">
        <h2><a href="/tokio-rs/axum">tokio-rs / axum</a></h2>
        <p>Ergonomic web framework</p>
        <span itemprop="programmingLanguage">Rust</span>
        <a href="/tokio-rs/axum/stargazers">20,000</a>
        <a href="/tokio-rs/axum/forks">1,000</a>
        <span class="float-sm-right">120 stars this week</span>
    </article>
</body></html>"#;

#[tokio::test]
async fn test_repo_is_scraped_then_cached() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tokio-rs/axum"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REPO_PAGE))
        .expect(1)
        .mount(&github)
        .await;

    let (app, store) = test_app_with_github(&github.uri());

    for _ in 0..2 {
        let response = get(&app, "/api/v1/github/repo/tokio-rs/axum").await;
        assert_eq!(response.status, StatusCode::OK);
        let repo = response.json();
        assert_eq!(repo["owner"], "tokio-rs");
        assert_eq!(repo["description"], "Fast web framework");
        assert_eq!(repo["stars"], "1234");
        assert_eq!(repo["forks"], "56");
        assert_eq!(repo["topics"], json!(["http"]));
    }

    assert!(store.get("repo:tokio-rs/axum").await.unwrap().is_some());

    let stats = get(&app, "/api/v1/github/stats").await.json();
    assert_eq!(stats["counters"]["github_repo"], 2);
    assert_eq!(stats["total"], 2);
}

#[tokio::test]
async fn test_trending_with_language_and_window() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trending/rust"))
        .and(query_param("since", "weekly"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TRENDING_PAGE))
        .mount(&github)
        .await;

    let (app, _) = test_app_with_github(&github.uri());
    let response = get(&app, "/api/v1/github/trending?language=rust&since=weekly").await;

    assert_eq!(response.status, StatusCode::OK);
    let repos = response.json();
    assert_eq!(repos[0]["rank"], 1);
    assert_eq!(repos[0]["owner"], "tokio-rs");
    assert_eq!(repos[0]["name"], "axum");
    assert_eq!(repos[0]["stars"], "20000");

    let bad_window = get(&app, "/api/v1/github/trending?since=yearly").await;
    assert_eq!(bad_window.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upstream_failure_is_generic_500() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway details"))
        .mount(&github)
        .await;

    let (app, _) = test_app_with_github(&github.uri());
    let response = get(&app, "/api/v1/github/user/octocat").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({ "error": "Failed to fetch user profile" })
    );
}

#[tokio::test]
async fn test_invalid_names_rejected() {
    let (app, _) = test_app();
    let response = get(&app, "/api/v1/github/user/bad%20name").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_github_proxy_rejects_non_github_scheme() {
    let (app, _) = test_app();
    let response = get(
        &app,
        &format!("/api/v1/github/fetch?url={}", encode("ftp://github.com/")),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
