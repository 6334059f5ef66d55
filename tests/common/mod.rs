// Shared helpers for driving the router in-process.
//
// Requests go through `tower::ServiceExt::oneshot`, so no socket is bound and
// the client IP comes from `x-forwarded-for` (or is "unknown").

#![allow(dead_code)] // Not every test file uses every helper

use std::sync::Arc;

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use ginkohub_tools::store::{KvStore, MemoryStore};
use ginkohub_tools::{build_router, AppState, Config};

/// A router over a fresh in-memory store, plus a handle on that store.
pub fn test_app() -> (Router, Arc<MemoryStore>) {
    test_app_with_config(Config::default())
}

/// Like [`test_app`] with the scraper pointed at `github_base_url`.
pub fn test_app_with_github(github_base_url: &str) -> (Router, Arc<MemoryStore>) {
    test_app_with_config(Config {
        github_base_url: github_base_url.to_string(),
        ..Default::default()
    })
}

fn test_app_with_config(config: Config) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let shared: Arc<dyn KvStore> = store.clone();
    let state = AppState::with_store(&config, shared).expect("Failed to build app state");
    (build_router(state), store)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "Body is not JSON ({}): {}",
                e,
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router should not fail");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(
        app,
        Request::get(uri)
            .body(Body::empty())
            .expect("Failed to build request"),
    )
    .await
}

/// POSTs a JSON body as client `ip`.
pub async fn post_json(app: &Router, uri: &str, ip: &str, body: Value) -> TestResponse {
    send(
        app,
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", ip)
            .body(Body::from(body.to_string()))
            .expect("Failed to build request"),
    )
    .await
}

/// Percent-encodes a URL for use as a query parameter value.
pub fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
