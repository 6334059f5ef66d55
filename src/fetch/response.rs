//! Output modes of the fetch proxy.

use axum::body::Body;
use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use url::Url;

use super::UpstreamResponse;
use crate::config::PASSTHROUGH_RESPONSE_HEADERS;
use crate::parse::{extract_page_meta, PageMeta};

/// Output mode selected by the `format` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Upstream status, allow-listed headers and the raw body
    #[default]
    Raw,
    /// Body as text wrapped with request details
    Json,
    /// Page metadata extracted from the body
    Meta,
}

impl OutputFormat {
    /// Anything other than `json` or `meta` selects the raw passthrough.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => OutputFormat::Json,
            Some("meta") => OutputFormat::Meta,
            _ => OutputFormat::Raw,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonEnvelope {
    contents: String,
    status: JsonStatus,
}

#[derive(Debug, Serialize)]
struct JsonStatus {
    url: String,
    content_type: Option<String>,
    http_code: u16,
    /// Milliseconds
    response_time: u64,
}

#[derive(Debug, Serialize)]
struct MetaEnvelope {
    url: String,
    status_code: u16,
    meta: PageMeta,
}

/// Renders an upstream response in the requested mode.
///
/// `target` is the URL the caller asked for; metadata URLs are resolved
/// against it.
pub fn render(upstream: UpstreamResponse, format: OutputFormat, target: &Url) -> Response {
    match format {
        OutputFormat::Raw => render_raw(upstream),
        OutputFormat::Json => {
            let content_type = upstream
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            Json(JsonEnvelope {
                contents: String::from_utf8_lossy(&upstream.body).into_owned(),
                status: JsonStatus {
                    url: upstream.final_url.to_string(),
                    content_type,
                    http_code: upstream.status.as_u16(),
                    response_time: u64::try_from(upstream.elapsed.as_millis()).unwrap_or(u64::MAX),
                },
            })
            .into_response()
        }
        OutputFormat::Meta => {
            let html = String::from_utf8_lossy(&upstream.body);
            Json(MetaEnvelope {
                url: target.to_string(),
                status_code: upstream.status.as_u16(),
                meta: extract_page_meta(&html, target),
            })
            .into_response()
        }
    }
}

fn render_raw(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;

    let headers = response.headers_mut();
    for name in PASSTHROUGH_RESPONSE_HEADERS {
        let name = HeaderName::from_static(*name);
        for value in upstream.headers.get_all(&name) {
            headers.append(name.clone(), value.clone());
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, HeaderValue};
    use std::time::Duration;

    fn upstream(body: &'static str) -> UpstreamResponse {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        headers.insert(header::SERVER, HeaderValue::from_static("nginx"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));
        UpstreamResponse {
            status: StatusCode::IM_A_TEAPOT,
            headers,
            final_url: Url::parse("https://example.com/final").unwrap(),
            body: Bytes::from_static(body.as_bytes()),
            elapsed: Duration::from_millis(42),
        }
    }

    fn target() -> Url {
        Url::parse("https://example.com/start").unwrap()
    }

    #[test]
    fn test_format_param() {
        assert_eq!(OutputFormat::from_param(None), OutputFormat::Raw);
        assert_eq!(OutputFormat::from_param(Some("JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_param(Some("meta")), OutputFormat::Meta);
        assert_eq!(OutputFormat::from_param(Some("xml")), OutputFormat::Raw);
    }

    #[tokio::test]
    async fn test_raw_copies_status_and_allowed_headers() {
        let response = render(upstream("<p>hi</p>"), OutputFormat::Raw, &target());
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        assert_eq!(response.headers().get_all(header::SET_COOKIE).iter().count(), 2);
        assert!(response.headers().get(header::SERVER).is_none());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<p>hi</p>");
    }

    #[tokio::test]
    async fn test_json_envelope() {
        let response = render(upstream("hello"), OutputFormat::Json, &target());
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["contents"], "hello");
        assert_eq!(value["status"]["url"], "https://example.com/final");
        assert_eq!(value["status"]["content_type"], "text/html");
        assert_eq!(value["status"]["http_code"], 418);
        assert_eq!(value["status"]["response_time"], 42);
    }

    #[tokio::test]
    async fn test_meta_envelope() {
        let response = render(
            upstream(r#"<meta property="og:title" content="X">"#),
            OutputFormat::Meta,
            &target(),
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["url"], "https://example.com/start");
        assert_eq!(value["status_code"], 418);
        assert_eq!(value["meta"]["title"], "X");
    }
}
