//! API documentation: an OpenAPI 3.0 document and a Swagger UI page.

use axum::response::Html;
use axum::Json;
use serde_json::{json, Map, Value};

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>GinkoHub Tools API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/docs-json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

/// (method, path, tag, summary, path/query parameters)
type Operation = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static [(&'static str, &'static str)],
);

const OPERATIONS: &[Operation] = &[
    ("get", "/fetch", "Fetch", "Proxy any http(s) URL (any method)", &[("url", "query"), ("format", "query"), ("headers", "query")]),
    ("get", "/github/fetch", "GitHub", "Proxy a github.com URL", &[("url", "query")]),
    ("get", "/github/repo/{owner}/{repo}", "GitHub", "Repository stats", &[("owner", "path"), ("repo", "path")]),
    ("get", "/github/trending", "GitHub", "Trending repositories", &[("language", "query"), ("since", "query")]),
    ("get", "/github/trending/developers", "GitHub", "Trending developers", &[("language", "query"), ("since", "query")]),
    ("get", "/github/user/{username}", "GitHub", "User profile", &[("username", "path")]),
    ("get", "/github/stats", "GitHub", "Usage counters", &[]),
    ("get", "/comments/{pageId}", "Comments", "List comments for a page", &[("pageId", "path")]),
    ("post", "/comments/{pageId}", "Comments", "Post a comment", &[("pageId", "path")]),
    ("post", "/comments/{pageId}/{commentId}/vote", "Comments", "Vote on a comment", &[("pageId", "path"), ("commentId", "path")]),
    ("get", "/tools/ip", "Tools", "Caller IP address", &[]),
    ("get", "/tools/qr", "Tools", "QR code as PNG data URL or SVG", &[("text", "query"), ("format", "query")]),
    ("get", "/tools/rss", "Tools", "Parse an RSS/Atom feed", &[("url", "query")]),
    ("post", "/tools/base64", "Tools", "Base64 encode or decode", &[]),
    ("post", "/tools/markdown", "Tools", "Render markdown to sanitized HTML", &[]),
    ("get", "/tools/password", "Tools", "Random password", &[("length", "query"), ("numbers", "query"), ("symbols", "query")]),
    ("post", "/tools/json-validate", "Tools", "Validate and pretty-print JSON", &[]),
    ("get", "/tools/convert-unit", "Tools", "Convert temperature, length or weight", &[("value", "query"), ("from", "query"), ("to", "query"), ("type", "query")]),
    ("post", "/tools/text-stats", "Tools", "Character, word and line counts", &[]),
    ("post", "/tools/text-transform", "Tools", "Case conversion, slug, reverse", &[]),
    ("get", "/tools/hit-counter/{id}", "Tools", "Hit counter badge", &[("id", "path"), ("format", "query"), ("label", "query"), ("theme", "query"), ("uid", "query"), ("mode", "query")]),
    ("post", "/images/convert", "Images", "Convert an uploaded image", &[]),
    ("post", "/images/metadata", "Images", "Dimensions and type of an uploaded image", &[]),
    ("get", "/system/info", "System", "Host information", &[]),
    ("get", "/system/stats", "System", "Uptime, request and usage counters", &[]),
    ("get", "/system/storage", "System", "Store backend and key count", &[]),
];

/// Builds the OpenAPI document served at `/docs-json`.
pub fn openapi_document() -> Value {
    let mut paths = Map::new();
    for (method, path, tag, summary, params) in OPERATIONS {
        let parameters: Vec<Value> = params
            .iter()
            .map(|(name, location)| {
                json!({
                    "name": name,
                    "in": location,
                    "required": *location == "path",
                    "schema": { "type": "string" },
                })
            })
            .collect();

        let entry = paths
            .entry(path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(methods) = entry {
            methods.insert(
                method.to_string(),
                json!({
                    "tags": [tag],
                    "summary": summary,
                    "parameters": parameters,
                    "responses": { "200": { "description": "OK" } },
                }),
            );
        }
    }

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "GinkoHub Tools API",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "servers": [{ "url": "/api/v1" }],
        "paths": paths,
    })
}

pub async fn docs_json() -> Json<Value> {
    Json(openapi_document())
}

pub async fn docs_page() -> Html<&'static str> {
    Html(SWAGGER_UI)
}
