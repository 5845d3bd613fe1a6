// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod processing;
pub mod commands;
pub mod view;
pub mod shell;

// Public exports for external consumers
pub use crate::core::{
    CompressionParams, CompressionSummary, ImagePayload, Phase, Preset, PreviewRegistry,
    QualityPercent, Session, SessionSnapshot,
};
pub use crate::commands::{download_name, CompressOutcome, WorkflowController};
pub use crate::processing::{CompressionOptions, Compressor, CompressorConfig, ImageCompressor};
pub use crate::utils::{
    format_bytes, format_bytes_default, CompressionError, CompressorError, CompressorResult,
    ValidationError, COMPRESSION_FAILED_MESSAGE, INVALID_FILE_MESSAGE,
};
pub use crate::view::{render, View};
