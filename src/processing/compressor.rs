//! The compression collaborator seam.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use crate::core::{CompressionParams, ImagePayload, ProgressCallback};
use crate::utils::CompressionError;

/// Everything a collaborator receives besides the payload.
#[derive(Clone)]
pub struct CompressionOptions {
    pub params: CompressionParams,
    /// Run the work off the calling task
    pub use_background_worker: bool,
    /// Best-effort percentage updates
    pub on_progress: ProgressCallback,
}

impl CompressionOptions {
    pub fn new(params: CompressionParams, on_progress: ProgressCallback) -> Self {
        Self {
            params,
            use_background_worker: true,
            on_progress,
        }
    }

    /// Options with a progress callback that ignores every update.
    pub fn silent(params: CompressionParams) -> Self {
        Self::new(params, Arc::new(|_: u8| {}))
    }

    pub fn report(&self, percent: u8) {
        (self.on_progress)(percent.min(100));
    }
}

impl fmt::Debug for CompressionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressionOptions")
            .field("params", &self.params)
            .field("use_background_worker", &self.use_background_worker)
            .finish_non_exhaustive()
    }
}

/// External routine that turns an image into a (usually) smaller one.
///
/// The workflow treats implementations as opaque: the output is trusted as
/// is, and any error fails the attempt.
pub trait Compressor: Send + Sync {
    fn compress(
        &self,
        payload: ImagePayload,
        options: CompressionOptions,
    ) -> impl Future<Output = Result<ImagePayload, CompressionError>> + Send;
}

impl<C: Compressor> Compressor for Arc<C> {
    fn compress(
        &self,
        payload: ImagePayload,
        options: CompressionOptions,
    ) -> impl Future<Output = Result<ImagePayload, CompressionError>> + Send {
        (**self).compress(payload, options)
    }
}
