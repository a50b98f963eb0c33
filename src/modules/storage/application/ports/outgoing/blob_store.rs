use std::path::PathBuf;

use async_trait::async_trait;

/// A locally-addressable file handed over by the presentation layer's picker.
///
/// Either a path on disk or bytes already in memory (the latter mostly for
/// tests and the in-memory backend).
#[derive(Debug, Clone)]
pub struct FileHandle {
    file_name: String,
    source: FileSource,
}

#[derive(Debug, Clone)]
enum FileSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl FileHandle {
    pub fn from_path(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file_name,
            source: FileSource::Path(path),
        }
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            source: FileSource::Bytes(bytes),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The only format check the wizard performs: the picked file must look
    /// like a PDF. In-memory files are checked by magic bytes as well.
    pub fn is_pdf(&self) -> bool {
        let by_name = self
            .file_name
            .rsplit('.')
            .next()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        match &self.source {
            FileSource::Path(_) => by_name,
            FileSource::Bytes(bytes) => by_name || bytes.starts_with(b"%PDF"),
        }
    }

    pub async fn read_bytes(&self) -> Result<Vec<u8>, BlobStoreError> {
        match &self.source {
            FileSource::Bytes(bytes) => Ok(bytes.clone()),
            FileSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| BlobStoreError::UploadFailed(format!("could not read file: {e}"))),
        }
    }
}

/// Reference to an uploaded blob, enough to mint a durable retrieval URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    pub bucket: String,
    pub path: String,
    /// Provider-issued access token, when the backend returns one at upload.
    pub token: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BlobStoreError {
    #[error("Could not upload the file: {0}")]
    UploadFailed(String),

    #[error("Could not get the file URL: {0}")]
    UrlFailed(String),
}

/// Port for binary blob storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload the file's bytes to `path` inside the configured bucket.
    async fn upload(&self, path: &str, file: &FileHandle) -> Result<BlobRef, BlobStoreError>;

    /// A durable retrieval URL for a previously uploaded blob.
    async fn get_url(&self, blob: &BlobRef) -> Result<String, BlobStoreError>;
}
