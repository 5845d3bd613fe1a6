//! `image`-crate compression collaborator.
//!
//! The first attempt re-encodes at the requested initial quality. While the
//! result is above the size ceiling, later attempts lower the quality and
//! shrink the dimensions by a fixed factor each. A result that is under the
//! ceiling but larger than the source only gets lower quality, and never for
//! the lossless formats. If no attempt beats a source that already fits the
//! ceiling, the source bytes are returned unchanged. The ceiling is a target,
//! not a guarantee: the last attempt is returned even if it is still too big.

use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

use crate::core::ImagePayload;
use crate::utils::{CompressionError, ValidationError};

use super::compressor::{CompressionOptions, Compressor};
use super::config::CompressorConfig;
use super::encode::{decode, encode_as};

/// Compressor that decodes and re-encodes with the `image` crate.
#[derive(Debug, Clone, Default)]
pub struct ImageCompressor {
    config: CompressorConfig,
}

impl ImageCompressor {
    pub fn new(config: CompressorConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }
}

impl Compressor for ImageCompressor {
    async fn compress(
        &self,
        payload: ImagePayload,
        options: CompressionOptions,
    ) -> Result<ImagePayload, CompressionError> {
        if !options.use_background_worker {
            return compress_single(&payload, &options, &self.config);
        }

        let config = self.config.clone();
        run_blocking(move || compress_single(&payload, &options, &config)).await
    }
}

/// Runs `task` on tokio's blocking pool, turning a panic into a [`CompressionError::Worker`].
async fn run_blocking<T, F>(task: F) -> Result<T, CompressionError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CompressionError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| CompressionError::Worker(format!("Task panicked: {e}")))?
}

// ── Blocking image processing (runs on tokio's blocking thread pool) ──────────────────

fn compress_single(
    payload: &ImagePayload,
    options: &CompressionOptions,
    config: &CompressorConfig,
) -> Result<ImagePayload, CompressionError> {
    let format = payload.format().ok_or_else(|| {
        CompressionError::decode(format!("Unsupported MIME type: {}", payload.mime_type()))
    })?;
    let total_steps = config.max_iterations.saturating_add(1);
    let max_bytes = options.params.max_size_bytes() as usize;
    let source_bytes = payload.bytes().len();

    options.report(0);
    let mut image = decode(payload.bytes(), format)?;
    ensure_min_dimensions(image.width(), image.height(), config)?;

    debug!(
        "Compressing '{}': {}x{}, {} bytes, ceiling {} bytes",
        payload.name(),
        image.width(),
        image.height(),
        source_bytes,
        max_bytes
    );

    let mut quality = options.params.initial_quality;
    let mut encoded = encode_as(&image, format, quality)?;
    options.report(step_percent(1, total_steps));

    let fits = |len: usize| len <= max_bytes && len <= source_bytes;

    let mut step = 1;
    while !fits(encoded.len()) && step < total_steps {
        let over_ceiling = encoded.len() > max_bytes;
        if !over_ceiling && !format.supports_quality() {
            debug!("{:?} encodes losslessly, nothing left to lower", format);
            break;
        }

        step += 1;
        quality *= config.quality_step;
        if over_ceiling {
            image = shrink(&image, config)?;
        }
        encoded = encode_as(&image, format, quality)?;
        options.report(step_percent(step, total_steps));

        debug!(
            "Attempt {}/{}: {}x{} at quality {:.3} -> {} bytes",
            step,
            total_steps,
            image.width(),
            image.height(),
            quality,
            encoded.len()
        );
    }

    options.report(100);

    if encoded.len() > source_bytes && source_bytes <= max_bytes {
        debug!("No attempt beat the source for '{}', keeping it", payload.name());
        return Ok(payload.clone());
    }
    Ok(ImagePayload::new(payload.name(), payload.mime_type(), encoded))
}

/// Scales both dimensions by the configured step.
fn shrink(image: &DynamicImage, config: &CompressorConfig) -> Result<DynamicImage, CompressionError> {
    let width = (f64::from(image.width()) * config.dimension_step).floor() as u32;
    let height = (f64::from(image.height()) * config.dimension_step).floor() as u32;
    ensure_min_dimensions(width, height, config)?;
    Ok(image.resize_exact(width, height, FilterType::Triangle))
}

fn ensure_min_dimensions(
    width: u32,
    height: u32,
    config: &CompressorConfig,
) -> Result<(), CompressionError> {
    let min = config.min_dimension.max(1);
    if width < min || height < min {
        return Err(CompressionError::TooSmall { width, height });
    }
    Ok(())
}

fn step_percent(step: u32, total_steps: u32) -> u8 {
    (step.saturating_mul(100) / total_steps.max(1)).min(99) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use parking_lot::Mutex;
    use image::RgbImage;
    use crate::core::CompressionParams;
    use crate::utils::ImageFormat;

    fn noise(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(7919) ^ y.wrapping_mul(104_729)) as u8;
            image::Rgb([v, v.wrapping_mul(3), v.wrapping_add(x as u8)])
        }))
    }

    fn noisy_jpeg_at(width: u32, height: u32, quality: f64) -> ImagePayload {
        let bytes = encode_as(&noise(width, height), ImageFormat::Jpeg, quality).unwrap();
        ImagePayload::new("noise.jpg", "image/jpeg", bytes)
    }

    fn noisy_jpeg(width: u32, height: u32) -> ImagePayload {
        noisy_jpeg_at(width, height, 1.0)
    }

    fn dimensions(payload: &ImagePayload) -> (u32, u32) {
        let format = payload.format().unwrap();
        let image = decode(payload.bytes(), format).unwrap();
        (image.width(), image.height())
    }

    fn recording_options(params: CompressionParams) -> (CompressionOptions, Arc<Mutex<Vec<u8>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut options = CompressionOptions::new(
            params,
            Arc::new(move |p: u8| sink.lock().push(p)),
        );
        options.use_background_worker = false;
        (options, seen)
    }

    #[tokio::test]
    async fn shrinks_large_jpeg_and_keeps_identity() {
        let source = noisy_jpeg(256, 256);
        let params = CompressionParams { max_size_mb: 0.01, initial_quality: 0.4 };
        let (options, seen) = recording_options(params);

        let output = ImageCompressor::default().compress(source.clone(), options).await.unwrap();
        assert!(output.size() < source.size());
        assert_eq!(output.name(), "noise.jpg");
        assert_eq!(output.mime_type(), "image/jpeg");
        assert!(decode(output.bytes(), ImageFormat::Jpeg).is_ok());

        let seen = seen.lock();
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn runs_on_background_worker() {
        let source = noisy_jpeg(64, 64);
        let params = CompressionParams { max_size_mb: 2.0, initial_quality: 0.5 };
        let output = ImageCompressor::default()
            .compress(source.clone(), CompressionOptions::silent(params))
            .await
            .unwrap();
        assert!(output.size() <= source.size());
    }

    #[tokio::test]
    async fn undecodable_payload_fails() {
        let payload = ImagePayload::new("bad.png", "image/png", b"nope".to_vec());
        let params = CompressionParams { max_size_mb: 1.0, initial_quality: 0.8 };
        let err = ImageCompressor::default()
            .compress(payload, CompressionOptions::silent(params))
            .await
            .unwrap_err();
        assert!(matches!(err, CompressionError::Decode(_)));
    }

    #[tokio::test]
    async fn tiny_image_that_cannot_fit_is_too_small() {
        let source = noisy_jpeg(1, 1);
        let params = CompressionParams { max_size_mb: 0.000_01, initial_quality: 0.8 };
        let (options, _) = recording_options(params);
        let err = ImageCompressor::default().compress(source, options).await.unwrap_err();
        assert!(matches!(err, CompressionError::TooSmall { width: 0, height: 0 }));
    }

    #[tokio::test]
    async fn jpeg_under_the_ceiling_keeps_its_dimensions() {
        let source = noisy_jpeg_at(200, 200, 0.5);
        let params = CompressionParams { max_size_mb: 1.0, initial_quality: 0.8 };
        let (options, seen) = recording_options(params);

        let output = ImageCompressor::default().compress(source.clone(), options).await.unwrap();
        assert_eq!(dimensions(&output), (200, 200));
        assert!(output.size() <= source.size());
        assert_eq!(seen.lock().last(), Some(&100));
    }

    #[tokio::test]
    async fn lossless_under_the_ceiling_is_never_downscaled() {
        for format in [ImageFormat::Png, ImageFormat::WebP] {
            let bytes = encode_as(&noise(96, 64), format, 1.0).unwrap();
            let source = ImagePayload::new("noise", format.mime_type(), bytes);
            let params = CompressionParams { max_size_mb: 1.0, initial_quality: 0.5 };
            let (options, _) = recording_options(params);

            let output = ImageCompressor::default().compress(source.clone(), options).await.unwrap();
            assert_eq!(dimensions(&output), (96, 64), "{format:?}");
            assert!(output.size() <= source.size(), "{format:?}");
        }
    }

    #[tokio::test]
    async fn worker_panic_becomes_an_error() {
        let err = run_blocking::<(), _>(|| panic!("decoder blew up")).await.unwrap_err();
        assert!(matches!(err, CompressionError::Worker(ref msg) if msg.starts_with("Task panicked")));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = CompressorConfig { dimension_step: 1.5, ..Default::default() };
        assert!(ImageCompressor::new(config).is_err());
        assert!(ImageCompressor::new(CompressorConfig::default()).is_ok());
    }

    #[test]
    fn step_percent_never_claims_done_early() {
        assert_eq!(step_percent(1, 11), 9);
        assert_eq!(step_percent(11, 11), 99);
        assert_eq!(step_percent(1, 0), 99);
        assert_eq!(step_percent(u32::MAX, u32::MAX), 1);
    }
}
