//! Saving the compressed result.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::processing::Compressor;
use crate::utils::{write_download, CompressorError, CompressorResult};
use super::WorkflowController;

/// File name a download is saved under.
pub fn download_name(original_name: &str) -> String {
    format!("compressed-{original_name}")
}

impl<C: Compressor> WorkflowController<C> {
    /// Writes the compressed file into `dir` as `compressed-<original name>`.
    ///
    /// Does not change the session. Fails outside the `Done` phase.
    pub async fn download(&self, dir: impl AsRef<Path>) -> CompressorResult<PathBuf> {
        let (name, compressed) = {
            let session = self.session.lock();
            match (session.original_file(), session.compressed_file()) {
                (Some(original), Some(compressed)) => {
                    (download_name(original.name()), compressed.clone())
                }
                _ => {
                    warn!("Download requested in the {:?} phase", session.phase());
                    return Err(CompressorError::workflow("Nothing to download yet"));
                }
            }
        };

        let target = write_download(dir, &name, compressed.bytes()).await?;
        debug!("Saved {} bytes to {}", compressed.size(), target.display());
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_original_name() {
        assert_eq!(download_name("cat.jpg"), "compressed-cat.jpg");
        assert_eq!(download_name("my photo.webp"), "compressed-my photo.webp");
    }
}
