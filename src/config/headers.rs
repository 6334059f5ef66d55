//! HTTP header name constants.
//!
//! Header lists consulted by the fetch proxy when assembling the outbound
//! request and when copying the upstream response back to the caller.

/// Prefix marking an inbound header as an explicit outbound override.
///
/// `x-proxy-authorization: Bearer t` is sent upstream as `authorization: Bearer t`.
pub const PROXY_HEADER_PREFIX: &str = "x-proxy-";

/// Connection-scoped headers that never cross the proxy.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "host",
    "accept-encoding",
    "content-length",
    "transfer-encoding",
    "upgrade",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
];

/// Message-framing headers the outbound client computes itself; dropped from every source
pub const FRAMING_HEADERS: &[&str] = &["connection", "content-length", "host", "transfer-encoding"];

/// Inbound headers dropped from passthrough in addition to the hop-by-hop set
pub const PASSTHROUGH_BLOCKED_HEADERS: &[&str] = &["cookie", "host"];

/// Upstream response headers copied onto the proxied response.
pub const PASSTHROUGH_RESPONSE_HEADERS: &[&str] = &[
    "content-type",
    "cache-control",
    "etag",
    "last-modified",
    "content-language",
    "content-security-policy",
    "set-cookie",
    "location",
];
