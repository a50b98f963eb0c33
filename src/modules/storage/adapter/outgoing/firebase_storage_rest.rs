use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::auth::application::ports::outgoing::SessionStore;
use crate::shared::firebase::{encode_object_path, FirebaseConfig};
use crate::storage::application::ports::outgoing::{
    BlobRef, BlobStore, BlobStoreError, FileHandle,
};

const STORAGE_BASE: &str = "https://firebasestorage.googleapis.com/v0";

/// Cloud Storage for Firebase REST adapter.
///
/// Uploads are simple (single-request) media uploads; the response carries a
/// `downloadTokens` value which, combined with the object path, yields the
/// durable download URL the profile documents store.
pub struct FirebaseStorageRest {
    http: reqwest::Client,
    bucket: String,
    sessions: SessionStore,
}

#[derive(Deserialize)]
struct ObjectMetadata {
    #[serde(rename = "downloadTokens")]
    download_tokens: Option<String>,
}

impl FirebaseStorageRest {
    pub fn new(config: &FirebaseConfig, sessions: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            bucket: config.storage_bucket.clone(),
            sessions,
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{STORAGE_BASE}/b/{}/o/{}",
            self.bucket,
            encode_object_path(path)
        )
    }

    fn bearer(&self) -> Result<String, BlobStoreError> {
        self.sessions
            .current()
            .map(|s| s.id_token)
            .ok_or_else(|| BlobStoreError::UploadFailed("not signed in".to_string()))
    }

    fn download_url(&self, path: &str, token: &str) -> String {
        format!(
            "{}?alt=media&token={}",
            self.object_url(path),
            token
        )
    }
}

#[async_trait]
impl BlobStore for FirebaseStorageRest {
    async fn upload(&self, path: &str, file: &FileHandle) -> Result<BlobRef, BlobStoreError> {
        let token = self.bearer()?;
        let bytes = file.read_bytes().await?;

        let response = self
            .http
            .post(format!("{STORAGE_BASE}/b/{}/o", self.bucket))
            .bearer_auth(token)
            .query(&[("uploadType", "media"), ("name", path)])
            .header(reqwest::header::CONTENT_TYPE, "application/pdf")
            .body(bytes)
            .send()
            .await
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BlobStoreError::UploadFailed(format!(
                "storage returned {}",
                response.status()
            )));
        }

        let metadata: ObjectMetadata = response
            .json()
            .await
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;

        debug!(%path, "object uploaded");
        Ok(BlobRef {
            bucket: self.bucket.clone(),
            path: path.to_string(),
            // First token only; Firebase may list several, comma-separated.
            token: metadata
                .download_tokens
                .and_then(|t| t.split(',').next().map(str::to_string)),
        })
    }

    async fn get_url(&self, blob: &BlobRef) -> Result<String, BlobStoreError> {
        if let Some(token) = &blob.token {
            return Ok(self.download_url(&blob.path, token));
        }

        // No token captured at upload time; fetch the object metadata.
        let bearer = self
            .sessions
            .current()
            .map(|s| s.id_token)
            .ok_or_else(|| BlobStoreError::UrlFailed("not signed in".to_string()))?;

        let response = self
            .http
            .get(self.object_url(&blob.path))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| BlobStoreError::UrlFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BlobStoreError::UrlFailed(format!(
                "storage returned {}",
                response.status()
            )));
        }

        let metadata: ObjectMetadata = response
            .json()
            .await
            .map_err(|e| BlobStoreError::UrlFailed(e.to_string()))?;

        let token = metadata
            .download_tokens
            .and_then(|t| t.split(',').next().map(str::to_string))
            .ok_or_else(|| BlobStoreError::UrlFailed("object has no download token".to_string()))?;

        Ok(self.download_url(&blob.path, &token))
    }
}
