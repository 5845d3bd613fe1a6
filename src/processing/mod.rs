//! Compression collaborators.
//!
//! - [`Compressor`]: The injectable seam the workflow calls through
//! - [`ImageCompressor`]: Size-targeting re-encoder built on the `image` crate

mod compressor;
mod config;
mod encode;
mod image_compressor;

pub use compressor::{CompressionOptions, Compressor};
pub use config::CompressorConfig;
pub use encode::quality_to_percent;
pub use image_compressor::ImageCompressor;
