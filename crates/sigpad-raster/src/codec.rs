//! Data URI encoding and decoding of surface buffers.

use base64::{Engine as _, engine::general_purpose};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, RgbaImage};
use sigpad_core::{DEFAULT_IMAGE_QUALITY, ImageFormat, PadError, Result};

/// Encode `pixels` as a base64 data URI.
///
/// `quality` applies to JPEG only; values outside `[0, 1]` fall back to
/// 0.92. WebP is always encoded losslessly. JPEG drops alpha, so transparent
/// pixels come out black.
pub fn encode_data_url(pixels: &RgbaImage, format: ImageFormat, quality: f64) -> Result<String> {
    let mut bytes = Vec::new();
    let encoded = match format {
        ImageFormat::Png => pixels.write_with_encoder(PngEncoder::new(&mut bytes)),
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(pixels.clone()).to_rgb8();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(
                &mut bytes,
                jpeg_quality(quality),
            ))
        }
        ImageFormat::Webp => pixels.write_with_encoder(WebPEncoder::new_lossless(&mut bytes)),
    };
    encoded.map_err(|e| PadError::Engine(format!("{format} encoding failed: {e}")))?;

    let body = general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:{};base64,{body}", format.mime()))
}

/// Decode a base64 data URI into RGBA pixels. The declared media type is
/// ignored; the bytes are sniffed.
pub fn decode_data_url(data_url: &str) -> Result<RgbaImage> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| PadError::Engine("not a data URI".to_string()))?;
    let (header, body) = rest
        .split_once(',')
        .ok_or_else(|| PadError::Engine("data URI has no payload".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(PadError::Engine("data URI is not base64 encoded".to_string()));
    }

    let bytes = general_purpose::STANDARD
        .decode(body.trim())
        .map_err(|e| PadError::Engine(format!("invalid base64 payload: {e}")))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| PadError::Engine(format!("undecodable image: {e}")))?;
    Ok(image.to_rgba8())
}

fn jpeg_quality(quality: f64) -> u8 {
    let quality = if (0.0..=1.0).contains(&quality) {
        quality
    } else {
        DEFAULT_IMAGE_QUALITY
    };
    ((quality * 100.0).round() as u8).max(1)
}
