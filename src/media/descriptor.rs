//! File descriptors handed to the registry on import.
//!
//! A descriptor carries the metadata of one picked file plus a one-shot
//! future that yields its bytes. The bytes can be retrieved exactly once:
//! `into_parts` consumes the descriptor.

use std::fmt;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;

/// Future resolving to the raw bytes of one file.
pub type ByteFuture = Pin<Box<dyn Future<Output = Result<Vec<u8>, ReadError>> + Send>>;

/// Reading the bytes of an imported file failed.
#[derive(Debug, thiserror::Error)]
#[error("failed to read {path}: {source}")]
pub struct ReadError {
    pub path: String,
    #[source]
    pub source: io::Error,
}

/// Metadata of a picked file, without its byte source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// `/`-separated path relative to the picked directory's parent.
    pub relative_path: String,
    pub size: u64,
    /// Media-type hint, may be empty or unreliable.
    pub media_type: String,
}

impl FileInfo {
    /// Filename only (last path segment).
    pub fn name(&self) -> &str {
        file_name(&self.relative_path)
    }
}

/// One file picked for import.
pub struct FileDescriptor {
    info: FileInfo,
    bytes: ByteFuture,
}

impl FileDescriptor {
    pub fn new<F>(
        relative_path: impl Into<String>,
        size: u64,
        media_type: impl Into<String>,
        bytes: F,
    ) -> Self
    where
        F: Future<Output = Result<Vec<u8>, ReadError>> + Send + 'static,
    {
        Self {
            info: FileInfo {
                relative_path: relative_path.into(),
                size,
                media_type: media_type.into(),
            },
            bytes: Box::pin(bytes),
        }
    }

    /// Descriptor whose bytes are already in memory.
    pub fn from_bytes(
        relative_path: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let size = bytes.len() as u64;
        Self::new(relative_path, size, media_type, async move { Ok(bytes) })
    }

    /// Descriptor reading its bytes from a file on disk when awaited.
    pub fn from_path(
        relative_path: impl Into<String>,
        path: PathBuf,
        size: u64,
        media_type: impl Into<String>,
    ) -> Self {
        Self::new(relative_path, size, media_type, async move {
            tokio::fs::read(&path).await.map_err(|source| ReadError {
                path: path.display().to_string(),
                source,
            })
        })
    }

    pub fn info(&self) -> &FileInfo {
        &self.info
    }

    /// Split into metadata and the one-shot byte future.
    pub fn into_parts(self) -> (FileInfo, ByteFuture) {
        (self.info, self.bytes)
    }
}

impl fmt::Debug for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDescriptor")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Last `/`-separated segment of a relative path.
pub fn file_name(relative_path: &str) -> &str {
    relative_path
        .rsplit_once('/')
        .map_or(relative_path, |(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_last_segment() {
        assert_eq!(file_name("studyA/series1/scan1.png"), "scan1.png");
        assert_eq!(file_name("lone.png"), "lone.png");
    }

    #[tokio::test]
    async fn test_from_bytes_yields_bytes_once() {
        let descriptor = FileDescriptor::from_bytes("studyA/scan1.png", "image/png", vec![1, 2, 3]);
        assert_eq!(descriptor.info().size, 3);
        assert_eq!(descriptor.info().name(), "scan1.png");

        let (info, bytes) = descriptor.into_parts();
        assert_eq!(info.media_type, "image/png");
        assert_eq!(bytes.await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_from_path_reports_missing_file() {
        let descriptor = FileDescriptor::from_path(
            "gone/scan.png",
            PathBuf::from("/nonexistent/scan.png"),
            10,
            "image/png",
        );

        let (_, bytes) = descriptor.into_parts();
        let err = bytes.await.unwrap_err();
        assert_eq!(err.path, "/nonexistent/scan.png");
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }
}
