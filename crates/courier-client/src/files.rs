//! Loading files for multipart attachments

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;

/// File contents ready to attach to a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Reads a file at a path into an attachable representation
#[async_trait]
pub trait FileReader: Send + Sync {
    async fn read(&self, path: &Path) -> std::io::Result<LoadedFile>;
}

/// [`FileReader`] over the local filesystem
///
/// The attachment name is the path's final component and the content type
/// is guessed from its extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

#[async_trait]
impl FileReader for FsReader {
    async fn read(&self, path: &Path) -> std::io::Result<LoadedFile> {
        let bytes = tokio::fs::read(path).await?;

        let file_name = path
            .file_name()
            .map_or_else(|| "file".to_owned(), |name| name.to_string_lossy().into_owned());

        let content_type = mime_guess::from_path(path).first_or_octet_stream().to_string();

        Ok(LoadedFile {
            file_name,
            content_type,
            bytes: Bytes::from(bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_name_type_and_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let file = FsReader.read(&path).await.unwrap();

        assert_eq!(file.file_name, "receipt.png");
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.bytes.as_ref(), b"\x89PNG");
    }

    #[tokio::test]
    async fn unknown_extension_is_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.zzqx");
        std::fs::write(&path, b"data").unwrap();

        let file = FsReader.read(&path).await.unwrap();
        assert_eq!(file.content_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsReader.read(&dir.path().join("absent.txt")).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
