//! Outbound header assembly.
//!
//! The outbound header set is built from an ordered list of sources. Each
//! source may only add names that no earlier source has set, so the order of
//! [`HeaderSource`] values is the precedence rule:
//!
//! 1. `x-proxy-*` inbound headers, prefix stripped
//! 2. the JSON object passed in the `headers` query parameter
//! 3. the remaining inbound headers, minus hop-by-hop, `cookie` and `host`
//! 4. a default browser user agent when none of the above supplied one

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::config::{
    DEFAULT_USER_AGENT, FRAMING_HEADERS, HOP_BY_HOP_HEADERS, PASSTHROUGH_BLOCKED_HEADERS,
    PROXY_HEADER_PREFIX,
};

/// One layer of the outbound header merge.
#[derive(Debug, Default)]
pub struct HeaderSource {
    pub label: &'static str,
    pub entries: Vec<(HeaderName, HeaderValue)>,
}

/// Inbound headers carrying the override prefix, with the prefix removed.
pub fn prefixed_overrides(inbound: &HeaderMap) -> HeaderSource {
    let entries = inbound
        .iter()
        .filter_map(|(name, value)| {
            let stripped = name.as_str().strip_prefix(PROXY_HEADER_PREFIX)?;
            let name = HeaderName::from_bytes(stripped.as_bytes()).ok()?;
            Some((name, value.clone()))
        })
        .collect();
    HeaderSource {
        label: "prefixed overrides",
        entries,
    }
}

/// Headers from a JSON object such as `{"accept":"text/html"}`.
///
/// Invalid JSON, a non-object, or entries whose name or value are not valid
/// header text are ignored. Numbers and booleans are sent as their text form.
pub fn json_header_block(raw: Option<&str>) -> HeaderSource {
    let mut source = HeaderSource {
        label: "header block",
        entries: Vec::new(),
    };
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return source;
    };

    let object = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => object,
        Ok(_) | Err(_) => {
            log::debug!("Ignoring header block that is not a JSON object");
            return source;
        }
    };

    for (name, value) in object {
        let text = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        let parsed = HeaderName::from_bytes(name.trim().to_ascii_lowercase().as_bytes())
            .ok()
            .zip(HeaderValue::from_str(&text).ok());
        if let Some(entry) = parsed {
            source.entries.push(entry);
        }
    }
    source
}

/// Inbound request headers that may be forwarded as-is.
pub fn passthrough(inbound: &HeaderMap) -> HeaderSource {
    let entries = inbound
        .iter()
        .filter(|(name, _)| {
            let name = name.as_str();
            !HOP_BY_HOP_HEADERS.contains(&name)
                && !PASSTHROUGH_BLOCKED_HEADERS.contains(&name)
                && !name.starts_with(PROXY_HEADER_PREFIX)
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    HeaderSource {
        label: "passthrough",
        entries,
    }
}

/// Merges sources in order; a name set by an earlier source is never touched
/// by a later one. Repeated names within one source are all kept.
pub fn merge_sources(sources: impl IntoIterator<Item = HeaderSource>) -> HeaderMap {
    let mut merged = HeaderMap::new();
    for source in sources {
        let already_set: Vec<HeaderName> = merged.keys().cloned().collect();
        let mut added = 0usize;
        for (name, value) in source.entries {
            if FRAMING_HEADERS.contains(&name.as_str()) || already_set.contains(&name) {
                continue;
            }
            merged.append(name, value);
            added += 1;
        }
        log::trace!("Header source '{}' contributed {} value(s)", source.label, added);
    }

    if !merged.contains_key(USER_AGENT) {
        merged.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    }
    merged
}

/// Builds the full outbound header set for a proxied request.
pub fn assemble_outbound_headers(inbound: &HeaderMap, header_block: Option<&str>) -> HeaderMap {
    merge_sources([
        prefixed_overrides(inbound),
        json_header_block(header_block),
        passthrough(inbound),
    ])
}
