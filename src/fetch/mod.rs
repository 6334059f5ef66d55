//! HTTP fetch/proxy engine.
//!
//! A proxied call goes through four steps:
//! 1. the target URL is validated (`crate::security`)
//! 2. the outbound header set is assembled from the inbound request ([`headers`])
//! 3. the request is sent, with retries for the general proxy ([`fetch_with_retry`])
//!    or once for the GitHub-only proxy ([`fetch_once`])
//! 4. the upstream response is rendered in the requested output mode ([`render`])

pub mod headers;
mod response;
mod retry;

use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::error_handling::FetchError;

pub use headers::assemble_outbound_headers;
pub use response::{render, OutputFormat};
pub use retry::fetch_with_retry;

/// A fully assembled outbound request.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub target: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl OutboundRequest {
    /// Builds the outbound request for `target` from the inbound method,
    /// headers and body, applying the header precedence rules.
    pub fn from_inbound(
        method: Method,
        target: Url,
        inbound: &HeaderMap,
        header_block: Option<&str>,
        body: Bytes,
    ) -> Self {
        Self {
            method,
            target,
            headers: assemble_outbound_headers(inbound, header_block),
            body,
        }
    }
}

/// What came back from upstream, fully buffered.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// URL after redirects
    pub final_url: Url,
    pub body: Bytes,
    pub elapsed: Duration,
}

/// Sends `request` once. Any HTTP status, including 4xx and 5xx, is a
/// successful transport result.
pub async fn fetch_once(
    client: &reqwest::Client,
    request: &OutboundRequest,
) -> Result<UpstreamResponse, FetchError> {
    let started = Instant::now();

    let mut builder = client
        .request(request.method.clone(), request.target.clone())
        .headers(request.headers.clone());
    if !request.body.is_empty() {
        builder = builder.body(request.body.clone());
    }

    let response = builder.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let final_url = response.url().clone();
    let body = response.bytes().await?;
    let elapsed = started.elapsed();

    log::debug!(
        "{} {} -> {} ({} bytes, {}ms)",
        request.method,
        request.target,
        status.as_u16(),
        body.len(),
        elapsed.as_millis()
    );

    Ok(UpstreamResponse {
        status,
        headers,
        final_url,
        body,
        elapsed,
    })
}
