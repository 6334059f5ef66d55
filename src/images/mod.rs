//! Image conversion and metadata.
//!
//! Decoding and encoding are delegated to the `image` crate; the format is
//! sniffed from the bytes, never taken from the upload's file name.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use serde::Serialize;

use crate::error_handling::ApiError;

/// Target formats accepted by the converter.
const TARGET_FORMATS: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("bmp", ImageFormat::Bmp),
    ("gif", ImageFormat::Gif),
    ("webp", ImageFormat::WebP),
    ("tiff", ImageFormat::Tiff),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub mime: String,
    pub color_type: String,
}

/// A re-encoded image and its content type.
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

fn target_format(name: Option<&str>) -> Result<ImageFormat, ApiError> {
    let name = name
        .map(|n| n.trim().to_ascii_lowercase())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "png".to_string());
    TARGET_FORMATS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, format)| *format)
        .ok_or_else(|| ApiError::bad_request(format!("Unsupported format: {}", name)))
}

fn decode(bytes: &[u8]) -> Result<(DynamicImage, ImageFormat), ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::bad_request("No image"));
    }
    let format = image::guess_format(bytes)
        .map_err(|_| ApiError::bad_request("Unsupported or corrupt image"))?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|_| ApiError::bad_request("Unsupported or corrupt image"))?;
    Ok((decoded, format))
}

/// Re-encodes an uploaded image. `format` defaults to PNG.
pub fn convert_image(bytes: &[u8], format: Option<&str>) -> Result<ConvertedImage, ApiError> {
    let target = target_format(format)?;
    let (decoded, _) = decode(bytes)?;

    // JPEG has no alpha channel; the other encoders take RGBA.
    let prepared = match target {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(decoded.to_rgb8()),
        _ => DynamicImage::ImageRgba8(decoded.to_rgba8()),
    };

    let mut out = Vec::new();
    prepared
        .write_to(&mut Cursor::new(&mut out), target)
        .map_err(|e| ApiError::internal("Conversion failed", e))?;

    Ok(ConvertedImage {
        bytes: out,
        mime: target.to_mime_type(),
    })
}

/// Dimensions, detected MIME type and color layout of an uploaded image.
pub fn image_metadata(bytes: &[u8]) -> Result<ImageMetadata, ApiError> {
    let (decoded, format) = decode(bytes)?;
    Ok(ImageMetadata {
        width: decoded.width(),
        height: decoded.height(),
        mime: format.to_mime_type().to_string(),
        color_type: format!("{:?}", decoded.color()),
    })
}

#[cfg(test)]
pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 128]));
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}
