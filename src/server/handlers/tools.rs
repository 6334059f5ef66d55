//! Stateless utility routes and the hit counter.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error_handling::ApiError;
use crate::hit_counter::{record_hit, render_badge, BadgeTheme, HitQuery};
use crate::security::validate_target_url;
use crate::server::extract::{ClientIp, JsonBody};
use crate::server::AppState;
use crate::store::track_usage;
use crate::tools::encoding::base64_convert;
use crate::tools::feed::{fetch_feed, FeedSummary};
use crate::tools::json::{validate_json, JsonValidation};
use crate::tools::markdown::render_markdown;
use crate::tools::password::generate_password;
use crate::tools::qr::{generate_qr, QrOutput};
use crate::tools::text::{text_stats, transform_request, TextStats};
use crate::tools::units::{convert_request, Conversion};

const SVG: &str = "image/svg+xml";
const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

#[derive(Debug, Deserialize)]
pub struct QrQuery {
    pub text: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RssQuery {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordQuery {
    pub length: Option<String>,
    pub numbers: Option<String>,
    pub symbols: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnitQuery {
    pub value: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextBody {
    pub text: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JsonValidateBody {
    pub json: Option<String>,
}

fn required_text(text: Option<String>) -> Result<String, ApiError> {
    text.ok_or_else(|| ApiError::bad_request("Missing text"))
}

/// Query flags are on unless explicitly `false` or `0`.
fn flag(value: Option<&str>) -> bool {
    !matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("false" | "0")
    )
}

/// `GET /tools/ip`
pub async fn ip(State(state): State<AppState>, ClientIp(ip): ClientIp) -> Json<Value> {
    track_usage(state.store.as_ref(), "ip").await;
    Json(json!({ "ip": ip }))
}

/// `GET /tools/qr?text=&format=`
pub async fn qr(
    State(state): State<AppState>,
    Query(query): Query<QrQuery>,
) -> Result<Response, ApiError> {
    let output = generate_qr(query.text.as_deref(), query.format.as_deref())?;
    track_usage(state.store.as_ref(), "qr").await;

    Ok(match output {
        QrOutput::DataUrl(data_url) => Json(json!({ "qr_code": data_url })).into_response(),
        QrOutput::Svg(svg) => ([(header::CONTENT_TYPE, SVG)], svg).into_response(),
    })
}

/// `GET /tools/rss?url=`
pub async fn rss(
    State(state): State<AppState>,
    Query(query): Query<RssQuery>,
) -> Result<Json<FeedSummary>, ApiError> {
    let url = validate_target_url(query.url.as_deref())?;
    let feed = fetch_feed(&state.general_client, &url).await?;
    track_usage(state.store.as_ref(), "rss").await;
    Ok(Json(feed))
}

/// `POST /tools/base64 {action, text}`
pub async fn base64(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<TextBody>,
) -> Result<Json<Value>, ApiError> {
    let result = base64_convert(body.action.as_deref(), body.text.as_deref())?;
    track_usage(state.store.as_ref(), "base64").await;
    Ok(Json(json!({ "result": result })))
}

/// `POST /tools/markdown {text}`
pub async fn markdown(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<TextBody>,
) -> Result<Json<Value>, ApiError> {
    let text = required_text(body.text)?;
    let html = render_markdown(&text);
    track_usage(state.store.as_ref(), "markdown").await;
    Ok(Json(json!({ "html": html })))
}

/// `GET /tools/password?length=&numbers=&symbols=`
pub async fn password(
    State(state): State<AppState>,
    Query(query): Query<PasswordQuery>,
) -> Result<Json<Value>, ApiError> {
    let length = query
        .length
        .as_deref()
        .map(|raw| {
            raw.trim()
                .parse::<usize>()
                .map_err(|_| ApiError::bad_request("Length must be a number"))
        })
        .transpose()?;
    let password = generate_password(
        length,
        flag(query.numbers.as_deref()),
        flag(query.symbols.as_deref()),
    )?;
    track_usage(state.store.as_ref(), "password").await;
    Ok(Json(json!({ "password": password })))
}

/// `POST /tools/json-validate {json}`
pub async fn json_validate(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<JsonValidateBody>,
) -> Result<Json<JsonValidation>, ApiError> {
    let raw = body
        .json
        .ok_or_else(|| ApiError::bad_request("Missing json"))?;
    let validation = validate_json(&raw);
    track_usage(state.store.as_ref(), "json_validate").await;
    Ok(Json(validation))
}

/// `GET /tools/convert-unit?value=&from=&to=&type=`
pub async fn convert_unit(
    State(state): State<AppState>,
    Query(query): Query<UnitQuery>,
) -> Result<Json<Conversion>, ApiError> {
    let conversion = convert_request(
        query.value.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
        query.kind.as_deref(),
    )?;
    track_usage(state.store.as_ref(), "convert_unit").await;
    Ok(Json(conversion))
}

/// `POST /tools/text-stats {text}`
pub async fn text_statistics(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<TextBody>,
) -> Result<Json<TextStats>, ApiError> {
    let text = required_text(body.text)?;
    track_usage(state.store.as_ref(), "text_stats").await;
    Ok(Json(text_stats(&text)))
}

/// `POST /tools/text-transform {text, action}`
pub async fn text_transform(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<TextBody>,
) -> Result<Json<Value>, ApiError> {
    let text = required_text(body.text)?;
    let result = transform_request(&text, body.action.as_deref())?;
    track_usage(state.store.as_ref(), "text_transform").await;
    Ok(Json(json!({ "result": result })))
}

/// `GET /hit-counter/{id}?format=&label=&theme=&uid=&mode=`
pub async fn hit_counter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HitQuery>,
    ClientIp(ip): ClientIp,
) -> Result<Response, ApiError> {
    let visitor = query.visitor_id(&ip);
    let count = record_hit(state.store.as_ref(), &id, visitor.as_deref()).await?;

    if query.wants_json() {
        return Ok(Json(json!({ "id": id, "count": count })).into_response());
    }

    let theme = BadgeTheme::from_param(query.theme.as_deref());
    let badge = render_badge(&query.label(), count, theme);
    Ok((
        [(header::CONTENT_TYPE, SVG), (header::CACHE_CONTROL, NO_CACHE)],
        badge,
    )
        .into_response())
}
