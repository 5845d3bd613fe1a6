pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;
pub mod size;

pub use error::{
    CompressionError,
    CompressorError,
    CompressorResult,
    ValidationError,
    COMPRESSION_FAILED_MESSAGE,
    INVALID_FILE_MESSAGE,
};
pub use validation::{validate_mime, validate_quality_percent};
pub use formats::ImageFormat;
pub use fs::{load_payload, write_download, declared_mime, extract_filename};
pub use size::{format_bytes, format_bytes_default};
