use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::shared::firebase::encode_object_path;
use crate::storage::application::ports::outgoing::{
    BlobRef, BlobStore, BlobStoreError, FileHandle,
};

/// In-memory blob backend for tests and local runs. Stores bytes by object
/// path and mints URLs in the same shape as the hosted storage API.
pub struct MemoryBlobStore {
    bucket: String,
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    /// Direct read for assertions.
    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("objects lock poisoned")
            .get(path)
            .cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().expect("objects lock poisoned").len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, path: &str, file: &FileHandle) -> Result<BlobRef, BlobStoreError> {
        let bytes = file.read_bytes().await?;
        self.objects
            .lock()
            .expect("objects lock poisoned")
            .insert(path.to_string(), bytes);

        Ok(BlobRef {
            bucket: self.bucket.clone(),
            path: path.to_string(),
            token: Some(Uuid::new_v4().to_string()),
        })
    }

    async fn get_url(&self, blob: &BlobRef) -> Result<String, BlobStoreError> {
        if self.object(&blob.path).is_none() {
            return Err(BlobStoreError::UrlFailed(format!(
                "no object at {}",
                blob.path
            )));
        }

        let token = blob
            .token
            .clone()
            .unwrap_or_else(|| "public".to_string());
        Ok(format!(
            "https://firebasestorage.googleapis.com/v0/b/{}/o/{}?alt=media&token={}",
            blob.bucket,
            encode_object_path(&blob.path),
            token
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> FileHandle {
        FileHandle::from_bytes("cv.pdf", b"%PDF-1.4 test".to_vec())
    }

    #[tokio::test]
    async fn upload_then_url() {
        let store = MemoryBlobStore::new("demo.appspot.com");
        let blob = store.upload("cvs/uid-1/cv.pdf", &pdf()).await.unwrap();

        assert_eq!(store.object("cvs/uid-1/cv.pdf").unwrap(), b"%PDF-1.4 test");

        let url = store.get_url(&blob).await.unwrap();
        assert!(url.starts_with(
            "https://firebasestorage.googleapis.com/v0/b/demo.appspot.com/o/cvs%2Fuid-1%2Fcv.pdf"
        ));
        assert!(url.contains("alt=media&token="));
    }

    #[tokio::test]
    async fn url_for_a_missing_object_fails() {
        let store = MemoryBlobStore::new("demo.appspot.com");
        let blob = BlobRef {
            bucket: "demo.appspot.com".to_string(),
            path: "nope.pdf".to_string(),
            token: None,
        };
        assert!(matches!(
            store.get_url(&blob).await.unwrap_err(),
            BlobStoreError::UrlFailed(_)
        ));
    }
}
