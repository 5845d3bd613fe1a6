//! Session state for one compression attempt.
//!
//! The files a session holds are carried by its [`Stage`], so a compressed
//! file can only exist in the `Done` stage and an original only once a file
//! has been accepted.

use serde::Serialize;
use tracing::debug;
use crate::core::presets::params_for;
use crate::core::{
    CompressionParams, CompressionSummary, ImagePayload, Phase, Preset, PreviewHandle,
    PreviewRegistry, QualityPercent,
};
use crate::utils::{
    validate_mime, CompressorError, CompressorResult, ValidationError, COMPRESSION_FAILED_MESSAGE,
};

/// A payload together with the preview handle created for it.
#[derive(Debug)]
pub struct LoadedImage {
    pub file: ImagePayload,
    pub preview: PreviewHandle,
}

impl LoadedImage {
    fn load(file: ImagePayload, previews: &PreviewRegistry) -> Self {
        let preview = previews.create(&file);
        Self { file, preview }
    }

    fn release(self) -> ImagePayload {
        self.preview.release();
        self.file
    }
}

#[derive(Debug, Default)]
enum Stage {
    #[default]
    Upload,
    Configure {
        original: LoadedImage,
    },
    Done {
        original: LoadedImage,
        compressed: LoadedImage,
    },
}

impl Stage {
    fn phase(&self) -> Phase {
        match self {
            Self::Upload => Phase::Upload,
            Self::Configure { .. } => Phase::Configure,
            Self::Done { .. } => Phase::Done,
        }
    }

    /// Releases every preview handle the stage holds.
    fn release(self) {
        match self {
            Self::Upload => {}
            Self::Configure { original } => {
                original.release();
            }
            Self::Done { original, compressed } => {
                compressed.release();
                original.release();
            }
        }
    }
}

/// The single mutable state of the workflow.
#[derive(Debug, Default)]
pub struct Session {
    stage: Stage,
    preset: Preset,
    custom_quality: QualityPercent,
    error_message: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.stage.phase()
    }

    pub fn original_file(&self) -> Option<&ImagePayload> {
        self.original().map(|o| &o.file)
    }

    pub fn original_preview(&self) -> Option<&PreviewHandle> {
        self.original().map(|o| &o.preview)
    }

    pub fn compressed_file(&self) -> Option<&ImagePayload> {
        self.compressed().map(|c| &c.file)
    }

    pub fn compressed_preview(&self) -> Option<&PreviewHandle> {
        self.compressed().map(|c| &c.preview)
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn custom_quality(&self) -> QualityPercent {
        self.custom_quality
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Compression parameters for the current preset.
    pub fn params(&self) -> CompressionParams {
        params_for(self.preset, self.custom_quality)
    }

    /// Size statistics, available once compression has succeeded.
    pub fn summary(&self) -> Option<CompressionSummary> {
        match &self.stage {
            Stage::Done { original, compressed } => Some(CompressionSummary::new(
                original.file.size(),
                compressed.file.size(),
            )),
            _ => None,
        }
    }

    fn original(&self) -> Option<&LoadedImage> {
        match &self.stage {
            Stage::Upload => None,
            Stage::Configure { original } | Stage::Done { original, .. } => Some(original),
        }
    }

    fn compressed(&self) -> Option<&LoadedImage> {
        match &self.stage {
            Stage::Done { compressed, .. } => Some(compressed),
            _ => None,
        }
    }

    // ── Transitions ─────────────────────────────────────────────────────────────────

    /// `Upload → Configure` on an accepted MIME type.
    ///
    /// A rejected file leaves the stage untouched and sets the fixed
    /// validation message.
    pub fn select_file(
        &mut self,
        file: ImagePayload,
        previews: &PreviewRegistry,
    ) -> Result<Phase, ValidationError> {
        if let Err(e) = validate_mime(file.mime_type()) {
            debug!("Rejected '{}': {}", file.name(), e);
            self.error_message = Some(e.user_message().to_string());
            return Err(e);
        }

        debug!("Accepted '{}' ({} bytes)", file.name(), file.size());
        let original = LoadedImage::load(file, previews);
        std::mem::replace(&mut self.stage, Stage::Configure { original }).release();
        self.error_message = None;
        Ok(self.phase())
    }

    /// `Configure → Configure`: changes the preset without touching files.
    pub fn set_preset(&mut self, preset: Preset) {
        self.preset = preset;
    }

    /// `Configure → Configure`: changes the custom quality without touching files.
    pub fn set_custom_quality(&mut self, quality: QualityPercent) {
        self.custom_quality = quality;
    }

    /// `Configure → Done` with the collaborator's output.
    pub fn complete(
        &mut self,
        compressed: ImagePayload,
        previews: &PreviewRegistry,
    ) -> CompressorResult<CompressionSummary> {
        let original = match std::mem::take(&mut self.stage) {
            Stage::Configure { original } => original,
            other => {
                let phase = other.phase();
                self.stage = other;
                return Err(CompressorError::workflow(format!(
                    "Cannot store a compressed file in the {phase:?} phase"
                )));
            }
        };

        let compressed = LoadedImage::load(compressed, previews);
        let summary = CompressionSummary::new(original.file.size(), compressed.file.size());
        self.stage = Stage::Done { original, compressed };
        self.error_message = None;
        Ok(summary)
    }

    /// Back to `Upload` after the collaborator failed, dropping all files.
    pub fn fail_compression(&mut self) {
        std::mem::take(&mut self.stage).release();
        self.error_message = Some(COMPRESSION_FAILED_MESSAGE.to_string());
    }

    /// Full reset to a fresh session, releasing both previews.
    pub fn reset(&mut self) {
        std::mem::take(&mut self.stage).release();
        self.preset = Preset::default();
        self.custom_quality = QualityPercent::default();
        self.error_message = None;
    }

    /// Serializable copy of the state, for rendering.
    pub fn snapshot(&self, is_compressing: bool, progress: Option<u8>) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            preset: self.preset,
            custom_quality: self.custom_quality.get(),
            error_message: self.error_message.clone(),
            is_compressing,
            progress,
            original: self.original().map(FileInfo::from),
            compressed: self.compressed().map(FileInfo::from),
            summary: self.summary(),
        }
    }
}

/// Display facts about one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub preview_url: String,
}

impl From<&LoadedImage> for FileInfo {
    fn from(image: &LoadedImage) -> Self {
        Self {
            name: image.file.name().to_string(),
            mime_type: image.file.mime_type().to_string(),
            size: image.file.size(),
            preview_url: image.preview.url().to_string(),
        }
    }
}

/// Point-in-time copy of a [`Session`] plus the controller's flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub preset: Preset,
    pub custom_quality: u8,
    pub error_message: Option<String>,
    pub is_compressing: bool,
    pub progress: Option<u8>,
    pub original: Option<FileInfo>,
    pub compressed: Option<FileInfo>,
    pub summary: Option<CompressionSummary>,
}
