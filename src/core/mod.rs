//! Core workflow types and state.
//!
//! - [`Session`]: The single mutable state of one compression attempt
//! - [`Preset`] / [`presets`]: Named presets and their compression parameters
//! - [`PreviewRegistry`]: Issues revocable preview handles for image bytes
//! - [`Progress`]: Observational progress of the in-flight compression

mod types;
mod preview;
mod progress;
mod session;
pub mod presets;

pub use types::{
    CompressionParams, CompressionSummary, ImagePayload, Phase, Preset, QualityPercent,
};
pub use preview::{PreviewHandle, PreviewRegistry, PreviewStats};
pub use progress::{Progress, ProgressCallback, ProgressTracker, ProgressType};
pub use session::{FileInfo, LoadedImage, Session, SessionSnapshot};
