//! Error types for the image compressor.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.

use std::io;
use thiserror::Error;
use serde::Serialize;

/// Message shown when a selected file is not one of the accepted image types.
pub const INVALID_FILE_MESSAGE: &str = "Please upload a valid JPG, PNG, or WebP image.";

/// Message shown for every failure of the compress step, whatever the cause.
pub const COMPRESSION_FAILED_MESSAGE: &str =
    "Failed to compress image. It might be too small or in an unsupported format.";

/// Validation errors for file selection and settings.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ValidationError {
    /// Declared MIME type is not in the accepted set
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    /// Invalid settings error
    #[error("Settings error: {0}")]
    Settings(String),
}

impl ValidationError {
    /// The fixed message surfaced to the user for this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnsupportedType(_) => INVALID_FILE_MESSAGE,
            Self::Settings(_) => "Quality must be a whole number between 1 and 100.",
        }
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

/// Failures raised by a compression collaborator.
///
/// The workflow collapses all of these into [`COMPRESSION_FAILED_MESSAGE`];
/// the variants only exist for the developer-facing trace.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum CompressionError {
    /// Payload could not be decoded as an image
    #[error("Decode failed: {0}")]
    Decode(String),
    /// Encoder rejected the image
    #[error("Encode failed: {0}")]
    Encode(String),
    /// Image shrank below the minimum dimension
    #[error("Image too small to compress further ({width}x{height})")]
    TooSmall { width: u32, height: u32 },
    /// Background task panicked or was cancelled
    #[error("Worker error: {0}")]
    Worker(String),
    /// Anything else a collaborator wants to report
    #[error("{0}")]
    Other(String),
}

impl CompressionError {
    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn other<T: Into<String>>(msg: T) -> Self {
        Self::Other(msg.into())
    }
}

/// Main error type for the compressor.
#[derive(Error, Debug, Serialize)]
pub enum CompressorError {
    /// File selection or settings validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The compression collaborator failed
    #[error("Compression error: {0}")]
    Compression(#[from] CompressionError),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),

    /// Action invoked in a phase that does not allow it
    #[error("Workflow error: {0}")]
    Workflow(String),
}

/// Convenience result type for compressor operations.
pub type CompressorResult<T> = Result<T, CompressorError>;

impl CompressorError {
    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }

    pub fn workflow<T: Into<String>>(msg: T) -> Self {
        Self::Workflow(msg.into())
    }
}

// Convert std::io::Error to CompressorError
impl From<io::Error> for CompressorError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_maps_to_fixed_message() {
        let err = ValidationError::UnsupportedType("image/gif".into());
        assert_eq!(err.user_message(), INVALID_FILE_MESSAGE);
        assert_eq!(err.to_string(), "Unsupported file type: image/gif");
    }

    #[test]
    fn io_errors_convert() {
        let err: CompressorError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, CompressorError::IO(ref msg) if msg.contains("gone")));
    }

    #[test]
    fn compression_errors_nest() {
        let err: CompressorError = CompressionError::TooSmall { width: 0, height: 3 }.into();
        assert_eq!(
            err.to_string(),
            "Compression error: Image too small to compress further (0x3)"
        );
    }
}
