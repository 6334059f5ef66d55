//! Image upload routes (multipart field `image`, optional field `format`).

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error_handling::ApiError;
use crate::images::{convert_image, image_metadata, ImageMetadata};
use crate::server::AppState;
use crate::store::track_usage;

#[derive(Debug, Default)]
struct Upload {
    image: Option<Bytes>,
    format: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut upload = Upload::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        match field.name() {
            Some("image") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                upload.image = Some(bytes);
            }
            Some("format") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                upload.format = Some(text);
            }
            _ => {}
        }
    }
    Ok(upload)
}

/// Decoding and encoding are CPU-bound, so they run on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::internal("Image processing failed", e))?
}

/// `POST /images/convert`
pub async fn convert(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_upload(multipart).await?;
    let image = upload
        .image
        .ok_or_else(|| ApiError::bad_request("No image uploaded"))?;
    let format = upload.format;

    let converted = blocking(move || convert_image(&image, format.as_deref())).await?;
    track_usage(state.store.as_ref(), "image_convert").await;

    Ok(([(header::CONTENT_TYPE, converted.mime)], converted.bytes).into_response())
}

/// `POST /images/metadata`
pub async fn metadata(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ImageMetadata>, ApiError> {
    let upload = read_upload(multipart).await?;
    let image = upload
        .image
        .ok_or_else(|| ApiError::bad_request("No image uploaded"))?;

    let metadata = blocking(move || image_metadata(&image)).await?;
    track_usage(state.store.as_ref(), "image_metadata").await;
    Ok(Json(metadata))
}
