//! Comment board routes.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::comments::{self, Comment, NewComment, VoteRequest};
use crate::error_handling::ApiError;
use crate::server::extract::{ClientIp, JsonBody};
use crate::server::AppState;

/// `GET /comments/{page_id}`
pub async fn list(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    comments::list_comments(state.store.as_ref(), &page_id)
        .await
        .map(Json)
}

/// `POST /comments/{page_id}`
pub async fn post(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    ClientIp(ip): ClientIp,
    JsonBody(input): JsonBody<NewComment>,
) -> Result<Json<Value>, ApiError> {
    let comment = comments::post_comment(state.store.as_ref(), &page_id, &ip, input).await?;
    Ok(Json(json!({ "success": true, "comment": comment })))
}

/// `POST /comments/{page_id}/{comment_id}/vote`
pub async fn vote(
    State(state): State<AppState>,
    Path((page_id, comment_id)): Path<(String, String)>,
    ClientIp(ip): ClientIp,
    JsonBody(request): JsonBody<VoteRequest>,
) -> Result<Json<Value>, ApiError> {
    let tally =
        comments::vote(state.store.as_ref(), &page_id, &comment_id, &ip, request).await?;
    Ok(Json(json!({
        "success": true,
        "ups": tally.ups,
        "downs": tally.downs,
    })))
}
