//! QR code rendering.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::render::svg;
use qrcode::types::QrError;
use qrcode::QrCode;

use crate::error_handling::ApiError;

const MIN_DIMENSION: u32 = 200;

/// Output of the QR tool.
#[derive(Debug, Clone, PartialEq)]
pub enum QrOutput {
    /// `data:image/png;base64,...`
    DataUrl(String),
    Svg(String),
}

fn encode(text: Option<&str>) -> Result<QrCode, ApiError> {
    let text = text
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing text"))?;
    QrCode::new(text.as_bytes()).map_err(|e| match e {
        QrError::DataTooLong => ApiError::bad_request("Text too long for a QR code"),
        other => ApiError::internal("QR generation failed", other),
    })
}

/// Renders `text` as a QR code, as an SVG document when `format` is `svg`
/// and as a PNG data URL otherwise.
pub fn generate_qr(text: Option<&str>, format: Option<&str>) -> Result<QrOutput, ApiError> {
    let code = encode(text)?;

    if format.is_some_and(|f| f.eq_ignore_ascii_case("svg")) {
        let document = code
            .render::<svg::Color>()
            .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
            .build();
        return Ok(QrOutput::Svg(document));
    }

    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .build();
    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ApiError::internal("QR generation failed", e))?;

    Ok(QrOutput::DataUrl(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(png)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_data_url() {
        let QrOutput::DataUrl(url) = generate_qr(Some("https://example.com"), None).unwrap() else {
            panic!("expected a data URL");
        };
        let encoded = url.strip_prefix("data:image/png;base64,").unwrap();
        let png = STANDARD.decode(encoded).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert!(decoded.width() >= MIN_DIMENSION);
    }

    #[test]
    fn test_svg_output() {
        let QrOutput::Svg(svg) = generate_qr(Some("hello"), Some("SVG")).unwrap() else {
            panic!("expected svg");
        };
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_missing_or_oversized_text() {
        assert!(matches!(generate_qr(None, None), Err(ApiError::BadRequest(_))));
        assert!(matches!(generate_qr(Some(""), None), Err(ApiError::BadRequest(_))));
        let huge = "x".repeat(8000);
        assert!(matches!(
            generate_qr(Some(&huge), None),
            Err(ApiError::BadRequest(_))
        ));
    }
}
