//! HTTP server.
//!
//! Top-level routes:
//! - `/` - health object
//! - `/docs`, `/docs-json` - Swagger UI and the OpenAPI document
//! - `/api/...` and `/api/v1/...` - the same API router mounted twice
//!
//! Every response passes through the request-accounting middleware, panics
//! in a handler become `500 {"error":"Server Error"}`, and CORS is permissive.

mod docs;
pub mod extract;
mod handlers;
mod state;

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::config::{Config, MAX_UPLOAD_SIZE};
use crate::error_handling::RequestStats;
use handlers::{comments, fetch, github, images, system, tools};

pub use docs::openapi_document;
pub use state::AppState;

/// Routes mounted under `/api` and `/api/v1`.
fn api_router() -> Router<AppState> {
    let uploads = Router::new()
        .route("/images/convert", post(images::convert))
        .route("/images/metadata", post(images::metadata))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE));

    Router::new()
        .route("/fetch", any(fetch::fetch))
        .route("/github/fetch", get(github::github_fetch))
        .route("/github/repo/{owner}/{repo}", get(github::repo))
        .route("/github/trending", get(github::trending))
        .route("/github/trending/developers", get(github::trending_developers))
        .route("/github/user/{username}", get(github::user))
        .route("/github/stats", get(github::stats))
        .route("/comments/{page_id}", get(comments::list).post(comments::post))
        .route("/comments/{page_id}/{comment_id}/vote", post(comments::vote))
        .route("/tools/ip", get(tools::ip))
        .route("/tools/qr", get(tools::qr))
        .route("/tools/rss", get(tools::rss))
        .route("/tools/base64", post(tools::base64))
        .route("/tools/markdown", post(tools::markdown))
        .route("/tools/password", get(tools::password))
        .route("/tools/json-validate", post(tools::json_validate))
        .route("/tools/convert-unit", get(tools::convert_unit))
        .route("/tools/text-stats", post(tools::text_statistics))
        .route("/tools/text-transform", post(tools::text_transform))
        .route("/tools/hit-counter/{id}", get(tools::hit_counter))
        .route("/hit-counter/{id}", get(tools::hit_counter))
        .route("/system/info", get(system::info))
        .route("/system/stats", get(system::stats))
        .route("/system/storage", get(system::storage))
        .merge(uploads)
}

/// Builds the complete application router.
pub fn build_router(state: AppState) -> Router {
    let api = api_router();
    let stats = Arc::clone(&state.stats);

    Router::new()
        .route("/", get(root))
        .route("/docs", get(docs::docs_page))
        .route("/docs-json", get(docs::docs_json))
        .nest("/api", api.clone())
        .nest("/api/v1", api)
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(stats, record_outcome))
        .layer(CorsLayer::permissive())
}

async fn root() -> Json<Value> {
    Json(json!({
        "status": "online",
        "message": "GinkoHub Tools API is running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

async fn record_outcome(
    State(stats): State<Arc<RequestStats>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    stats.record(response.status());
    response
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    log::error!("Handler panicked: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Server Error" })),
    )
        .into_response()
}

/// Binds the listener and serves until Ctrl+C or SIGTERM.
pub async fn run_server(config: Config) -> Result<(), anyhow::Error> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to {}: {}", address, e))?;

    log::info!("GinkoHub Tools API listening on http://{}/", address);
    log::info!("  - API: http://{}/api/v1", address);
    log::info!("  - Docs: http://{}/docs", address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => log::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                log::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                log::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                log::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panic_maps_to_generic_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "error": "Server Error" }));
    }

    #[tokio::test]
    async fn test_panic_with_owned_message() {
        let response = handle_panic(Box::new(String::from("index out of bounds")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
