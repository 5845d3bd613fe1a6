//! Maps a quality factor to format-specific `image` encoder calls.
//!
//! Only JPEG is lossy here: the `image` crate's PNG and WebP encoders are
//! lossless, so for those formats quality is ignored and size comes down
//! through dimensions alone.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{ColorType, DynamicImage};
use crate::utils::{CompressionError, ImageFormat};

type Result<T> = std::result::Result<T, CompressionError>;

/// Converts a quality factor in `(0, 1]` to the encoder's 1-100 scale.
pub fn quality_to_percent(quality: f64) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Decodes `bytes` as `format`.
pub fn decode(bytes: &[u8], format: ImageFormat) -> Result<DynamicImage> {
    image::load_from_memory_with_format(bytes, format.codec())
        .map_err(|e| CompressionError::decode(format!("{format:?}: {e}")))
}

/// Encodes `image` as JPEG at `quality`, dropping any alpha channel.
pub fn encode_jpeg(image: &DynamicImage, quality: f64) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality_to_percent(quality));
    rgb.write_with_encoder(encoder)
        .map_err(|e| CompressionError::encode(format!("JPEG encode failed: {e}")))?;
    Ok(buffer)
}

/// Encodes `image` as PNG with maximum deflate effort.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let image = match image.color() {
        ColorType::Rgb32F | ColorType::Rgba32F => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ => image.clone(),
    };
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive);
    image
        .write_with_encoder(encoder)
        .map_err(|e| CompressionError::encode(format!("PNG encode failed: {e}")))?;
    Ok(buffer)
}

/// Encodes `image` as lossless WebP.
pub fn encode_webp(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let image = if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };
    let encoder = WebPEncoder::new_lossless(&mut buffer);
    image
        .write_with_encoder(encoder)
        .map_err(|e| CompressionError::encode(format!("WebP encode failed: {e}")))?;
    Ok(buffer)
}

/// Dispatches to the correct encoder for `format`.
pub fn encode_as(image: &DynamicImage, format: ImageFormat, quality: f64) -> Result<Vec<u8>> {
    match format {
        ImageFormat::Jpeg => encode_jpeg(image, quality),
        ImageFormat::Png => encode_png(image),
        ImageFormat::WebP => encode_webp(image),
    }
}
