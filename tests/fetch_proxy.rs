//! Fetch proxy behavior against a local mock upstream.

mod common;

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{encode, get, send, test_app};

#[tokio::test]
async fn test_non_http_scheme_rejected_without_outbound_call() {
    let (app, _) = test_app();
    let response = get(&app, &format!("/api/v1/fetch?url={}", encode("ftp://example.com"))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({ "error": "Invalid url protocol" }));
}

#[tokio::test]
async fn test_missing_and_malformed_url() {
    let (app, _) = test_app();

    let missing = get(&app, "/api/v1/fetch").await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.json(), json!({ "error": "Missing url" }));

    let malformed = get(&app, "/api/v1/fetch?url=not%20a%20url").await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_raw_passthrough_copies_allow_listed_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("etag", "\"v1\"")
                .insert_header("x-internal", "secret")
                .set_body_string("hello upstream"),
        )
        .mount(&server)
        .await;

    let (app, _) = test_app();
    let target = format!("{}/page", server.uri());
    let response = get(&app, &format!("/api/v1/fetch?url={}", encode(&target))).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.text(), "hello upstream");
    assert_eq!(response.header("etag"), Some("\"v1\""));
    assert_eq!(response.header("content-type"), Some("text/plain"));
    assert_eq!(response.header("x-internal"), None);
}

#[tokio::test]
async fn test_upstream_4xx_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = test_app();
    let response = get(&app, &format!("/api/v1/fetch?url={}", encode(&server.uri()))).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "gone");
}

#[tokio::test]
async fn test_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<p>hi</p>", "text/html"),
        )
        .mount(&server)
        .await;

    let (app, _) = test_app();
    let target = format!("{}/data", server.uri());
    let response = get(
        &app,
        &format!("/api/v1/fetch?url={}&format=json", encode(&target)),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["contents"], "<p>hi</p>");
    assert_eq!(body["status"]["url"], target);
    assert_eq!(body["status"]["content_type"], "text/html");
    assert_eq!(body["status"]["http_code"], 200);
    assert!(body["status"]["response_time"].is_u64());
}

#[tokio::test]
async fn test_meta_output_prefers_og_title() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head>
                <meta property="og:title" content="X">
                <meta property="og:image" content="/img/cover.png">
            </head><body></body></html>"#,
        ))
        .mount(&server)
        .await;

    let (app, _) = test_app();
    let target = format!("{}/article", server.uri());
    let response = get(
        &app,
        &format!("/api/v1/fetch?url={}&format=meta", encode(&target)),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status_code"], 200);
    assert_eq!(body["meta"]["title"], "X");
    assert_eq!(
        body["meta"]["image"],
        format!("{}/img/cover.png", server.uri())
    );
    assert_eq!(body["meta"]["favicon"], format!("{}/favicon.ico", server.uri()));
}

#[tokio::test]
async fn test_header_precedence_and_blocking() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/echo"))
        .and(header("authorization", "Bearer from-prefix"))
        .and(header("x-trace", "from-block"))
        .and(header("accept", "text/plain"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("matched"))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = test_app();
    let target = format!("{}/echo", server.uri());
    let block = json!({ "authorization": "Bearer from-block", "x-trace": "from-block" }).to_string();
    let request = Request::post(format!(
        "/api/v1/fetch?url={}&headers={}",
        encode(&target),
        encode(&block)
    ))
    .header("x-proxy-authorization", "Bearer from-prefix")
    .header("authorization", "Bearer from-passthrough")
    .header("accept", "text/plain")
    .header("cookie", "session=should-not-leak")
    .body(Body::from("payload"))
    .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "matched");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("cookie").is_none());
    assert_eq!(received[0].body, b"payload");
}

#[tokio::test]
async fn test_retries_transient_5xx_with_backoff() {
    let server = MockServer::start().await;
    // Mounted first, so it answers the first two requests.
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = test_app();
    let target = format!("{}/flaky", server.uri());
    let started = Instant::now();
    let response = get(&app, &format!("/api/v1/fetch?url={}", encode(&target))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "finally");
    assert!(started.elapsed() >= Duration::from_secs(3));
}

#[tokio::test]
async fn test_persistent_5xx_becomes_bad_gateway_after_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;

    let (app, _) = test_app();
    let target = format!("{}/down", server.uri());
    let started = Instant::now();
    let response = get(&app, &format!("/api/v1/fetch?url={}", encode(&target))).await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.json(), json!({ "error": "upstream returned 503" }));
    assert!(started.elapsed() >= Duration::from_secs(7));
}

#[tokio::test]
async fn test_unreachable_upstream_becomes_bad_gateway() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let (app, _) = test_app();
    let target = format!("http://127.0.0.1:{}/", port);
    let started = Instant::now();
    let response = get(&app, &format!("/api/v1/fetch?url={}", encode(&target))).await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(response.json()["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(started.elapsed() >= Duration::from_secs(7));
}

#[tokio::test]
async fn test_github_proxy_rejects_other_hosts() {
    let (app, _) = test_app();

    let other = get(
        &app,
        &format!("/api/v1/github/fetch?url={}", encode("https://example.com/")),
    )
    .await;
    assert_eq!(other.status, StatusCode::BAD_REQUEST);
    assert_eq!(other.json(), json!({ "error": "URL host not allowed" }));

    let lookalike = get(
        &app,
        &format!("/api/v1/github/fetch?url={}", encode("https://github.com.evil.io/")),
    )
    .await;
    assert_eq!(lookalike.status, StatusCode::BAD_REQUEST);
}
