//! General fetch proxy.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use serde::Deserialize;

use crate::error_handling::ApiError;
use crate::fetch::{fetch_with_retry, render, OutboundRequest, OutputFormat};
use crate::security::validate_target_url;
use crate::server::AppState;
use crate::store::track_usage;

#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    pub url: Option<String>,
    pub format: Option<String>,
    /// JSON object of extra outbound headers
    pub headers: Option<String>,
}

/// `ANY /fetch?url=&format=&headers=`
pub async fn fetch(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let target = validate_target_url(query.url.as_deref())?;
    let format = OutputFormat::from_param(query.format.as_deref());

    let request = OutboundRequest::from_inbound(
        method,
        target.clone(),
        &headers,
        query.headers.as_deref(),
        body,
    );
    let upstream = fetch_with_retry(&state.general_client, &request).await?;

    track_usage(state.store.as_ref(), "fetch").await;
    Ok(render(upstream, format, &target))
}
