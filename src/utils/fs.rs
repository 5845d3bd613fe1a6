use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use crate::core::ImagePayload;
use crate::utils::{CompressorError, CompressorResult, ImageFormat};

/// MIME type declared for files whose extension is not a known image type.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Reads a file from disk into a payload.
///
/// The declared MIME type comes from the extension, the way a browser file
/// picker declares it; content is not sniffed. Unknown extensions are declared
/// as [`UNKNOWN_MIME`] and left for validation to reject.
pub async fn load_payload(path: impl AsRef<Path>) -> CompressorResult<ImagePayload> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .await
        .map_err(|e| CompressorError::io(format!("Failed to read {}: {e}", path.display())))?;

    let name = extract_filename(path).to_string();
    let mime = declared_mime(path);
    debug!("Loaded '{}' ({} bytes, {})", name, bytes.len(), mime);

    Ok(ImagePayload::new(name, mime, bytes))
}

/// Writes `bytes` to `dir/file_name`, creating `dir` if needed.
pub async fn write_download(
    dir: impl AsRef<Path>,
    file_name: &str,
    bytes: &[u8],
) -> CompressorResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).await?;
    let target = dir.join(file_name);
    fs::write(&target, bytes)
        .await
        .map_err(|e| CompressorError::io(format!("Failed to write {}: {e}", target.display())))?;
    Ok(target)
}

/// Get the MIME type a file picker would declare for `path`
pub fn declared_mime(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse::<ImageFormat>().ok())
        .map(|f| f.mime_type())
        .unwrap_or(UNKNOWN_MIME)
}

/// Final path component, or the whole path when it has none
pub fn extract_filename(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_else(|| path.to_str().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(declared_mime(Path::new("a/photo.JPG")), "image/jpeg");
        assert_eq!(declared_mime(Path::new("icon.png")), "image/png");
        assert_eq!(declared_mime(Path::new("x.webp")), "image/webp");
        assert_eq!(declared_mime(Path::new("anim.gif")), UNKNOWN_MIME);
        assert_eq!(declared_mime(Path::new("README")), UNKNOWN_MIME);
    }

    #[tokio::test]
    async fn load_and_write_round_trip_through_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("cat.png");
        std::fs::write(&source, b"not really a png").unwrap();

        let payload = load_payload(&source).await.unwrap();
        assert_eq!(payload.name(), "cat.png");
        assert_eq!(payload.mime_type(), "image/png");
        assert_eq!(payload.size(), 16);

        let out_dir = tmp.path().join("nested/out");
        let written = write_download(&out_dir, "compressed-cat.png", payload.bytes())
            .await
            .unwrap();
        assert_eq!(written, out_dir.join("compressed-cat.png"));
        assert_eq!(std::fs::read(written).unwrap(), b"not really a png");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = load_payload("/nonexistent/image.jpg").await.unwrap_err();
        assert!(matches!(err, CompressorError::IO(_)));
    }
}
