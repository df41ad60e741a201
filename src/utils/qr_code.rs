//! QR code rendering for short URLs.

use base64::Engine as _;
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

use crate::error::AppError;
use serde_json::json;

/// Minimum rendered size in pixels.
const QR_MIN_DIMENSION: u32 = 200;

const DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

/// Renders `text` as a QR code and returns it as an SVG `data:` URI.
///
/// Uses error-correction level M, a quiet zone, and black modules on white.
/// The same input always produces the same image.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the text does not fit in a QR code.
pub fn render_data_uri(text: &str) -> Result<String, AppError> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::M).map_err(|e| {
        AppError::internal(
            "Failed to generate QR code",
            json!({ "reason": e.to_string() }),
        )
    })?;

    let image = code
        .render::<svg::Color>()
        .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
        .quiet_zone(true)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    Ok(format!(
        "{DATA_URI_PREFIX}{}",
        base64::engine::general_purpose::STANDARD.encode(image)
    ))
}
