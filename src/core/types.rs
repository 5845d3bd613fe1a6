//! Core types for the compression workflow.

use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::utils::ImageFormat;

/// A user-supplied or collaborator-produced binary image.
///
/// Bytes are shared, so cloning a payload never copies image data.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl ImagePayload {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Display name, as chosen by the user
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared MIME type
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Format implied by the declared MIME type, if it is an accepted one
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime(&self.mime_type)
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Named compression aggressiveness level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Low,
    #[default]
    Medium,
    High,
    Custom,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Self::Low, Self::Medium, Self::High, Self::Custom];

    /// Parses a preset name, falling back to [`Preset::Medium`] for anything
    /// unrecognized.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "custom" => Self::Custom,
            _ => Self::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer quality percentage in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct QualityPercent(u8);

impl QualityPercent {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;
    pub const DEFAULT: QualityPercent = QualityPercent(70);

    /// Clamps `value` into `1..=100`.
    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// The percentage as a quality factor in `(0, 1]`.
    pub fn as_factor(&self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Default for QualityPercent {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for QualityPercent {
    type Error = crate::utils::ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        crate::utils::validate_quality_percent(value).map(Self)
    }
}

impl From<QualityPercent> for u8 {
    fn from(value: QualityPercent) -> Self {
        value.0
    }
}

/// Current step of the three-step workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Upload,
    Configure,
    Done,
}

/// Concrete parameters handed to the compression collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionParams {
    /// Target size ceiling in megabytes
    pub max_size_mb: f64,
    /// Starting quality factor in `(0, 1]`
    pub initial_quality: f64,
}

impl CompressionParams {
    /// The size ceiling in bytes (1 MB = 1024 * 1024 bytes).
    pub fn max_size_bytes(&self) -> u64 {
        (self.max_size_mb * 1024.0 * 1024.0) as u64
    }
}

/// Size statistics for a finished compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionSummary {
    /// Original file size in bytes
    pub original_size: u64,
    /// Compressed file size in bytes
    pub compressed_size: u64,
    /// Bytes saved (negative if the file grew)
    pub saved_bytes: i64,
    /// Saved bytes as a rounded percentage of the original
    pub saved_percent: i64,
}

impl CompressionSummary {
    pub fn new(original_size: u64, compressed_size: u64) -> Self {
        let saved_bytes = original_size as i64 - compressed_size as i64;
        let saved_percent = if original_size > 0 {
            (saved_bytes as f64 / original_size as f64 * 100.0).round() as i64
        } else {
            0
        };

        Self {
            original_size,
            compressed_size,
            saved_bytes,
            saved_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_names_fall_back_to_medium() {
        assert_eq!(Preset::from_name("low"), Preset::Low);
        assert_eq!(Preset::from_name(" HIGH "), Preset::High);
        assert_eq!(Preset::from_name("custom"), Preset::Custom);
        assert_eq!(Preset::from_name("ultra"), Preset::Medium);
        assert_eq!(Preset::from_name(""), Preset::Medium);
        assert_eq!(Preset::default(), Preset::Medium);
    }

    #[test]
    fn quality_percent_clamps_and_converts() {
        assert_eq!(QualityPercent::clamped(0).get(), 1);
        assert_eq!(QualityPercent::clamped(250).get(), 100);
        assert_eq!(QualityPercent::default().get(), 70);
        assert_eq!(QualityPercent::clamped(35).as_factor(), 0.35);
        assert!(QualityPercent::try_from(0u8).is_err());
        assert!(QualityPercent::try_from(101u8).is_err());
    }

    #[test]
    fn quality_percent_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<QualityPercent>("0").is_err());
        assert_eq!(serde_json::from_str::<QualityPercent>("42").unwrap().get(), 42);
    }

    #[test]
    fn summary_matches_display_math() {
        let summary = CompressionSummary::new(2_097_152, 150_000);
        assert_eq!(summary.saved_bytes, 1_947_152);
        assert_eq!(summary.saved_percent, 93);

        let grew = CompressionSummary::new(100, 150);
        assert_eq!(grew.saved_bytes, -50);
        assert_eq!(grew.saved_percent, -50);

        assert_eq!(CompressionSummary::new(0, 0).saved_percent, 0);
    }

    #[test]
    fn payload_debug_hides_bytes() {
        let payload = ImagePayload::new("a.png", "image/png", vec![0u8; 4]);
        assert_eq!(
            format!("{payload:?}"),
            r#"ImagePayload { name: "a.png", mime_type: "image/png", size: 4 }"#
        );
        assert_eq!(payload.format(), Some(ImageFormat::Png));
    }
}
