//! In-memory storage gateway.
//!
//! The backend fake used by allocator and lifecycle tests: a nested map of
//! container name to blob name to bytes, guarded by a single `RwLock`. It
//! honors the same contract as the real adapters, including the
//! backend-computed content hash and idempotent container creation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use docvault_core::{Error, Result, StorageGateway, UploadReceipt};

use crate::content_hash;

#[derive(Debug, Clone, Default)]
struct Blob {
    data: Vec<u8>,
    metadata: HashMap<String, String>,
}

/// In-memory [`StorageGateway`] fake.
#[derive(Default)]
pub struct MemoryGateway {
    containers: RwLock<HashMap<String, HashMap<String, Blob>>>,
    fail_metadata: AtomicBool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent metadata attachments fail while leaving the primary
    /// write in place. Used to exercise the distinct attachment error.
    pub fn fail_metadata_attachment(&self, fail: bool) {
        self.fail_metadata.store(fail, Ordering::SeqCst);
    }

    /// Stored metadata for a blob, if any.
    pub async fn metadata(&self, container: &str, name: &str) -> Option<HashMap<String, String>> {
        self.containers
            .read()
            .await
            .get(container)
            .and_then(|blobs| blobs.get(name))
            .map(|blob| blob.metadata.clone())
    }
}

#[async_trait]
impl StorageGateway for MemoryGateway {
    async fn container_exists(&self, container: &str) -> Result<bool> {
        Ok(self.containers.read().await.contains_key(container))
    }

    async fn blob_exists(&self, container: &str, name: &str) -> Result<bool> {
        Ok(self
            .containers
            .read()
            .await
            .get(container)
            .is_some_and(|blobs| blobs.contains_key(name)))
    }

    async fn upload(
        &self,
        container: &str,
        name: &str,
        data: &[u8],
        metadata: &HashMap<String, String>,
    ) -> Result<UploadReceipt> {
        let hash = content_hash(data);
        let location = format!("mem://{}/{}", container, name);
        {
            let mut containers = self.containers.write().await;
            let blobs = containers
                .get_mut(container)
                .ok_or_else(|| Error::Storage(format!("container {} does not exist", container)))?;
            blobs.insert(
                name.to_string(),
                Blob {
                    data: data.to_vec(),
                    metadata: HashMap::new(),
                },
            );
        }

        // Metadata is attached after the primary write; a failure here must
        // not roll the blob back.
        if !metadata.is_empty() {
            if self.fail_metadata.load(Ordering::SeqCst) {
                return Err(Error::MetadataAttachment(
                    location,
                    "metadata rejected".to_string(),
                ));
            }
            let mut containers = self.containers.write().await;
            if let Some(blob) = containers
                .get_mut(container)
                .and_then(|blobs| blobs.get_mut(name))
            {
                blob.metadata = metadata.clone();
            }
        }

        Ok(UploadReceipt {
            location,
            content_hash: hash,
        })
    }

    async fn open(&self, container: &str, name: &str) -> Result<Vec<u8>> {
        self.containers
            .read()
            .await
            .get(container)
            .and_then(|blobs| blobs.get(name))
            .map(|blob| blob.data.clone())
            .ok_or_else(|| Error::NotFound(format!("{}/{}", container, name)))
    }

    async fn delete(&self, container: &str, name: &str) -> Result<bool> {
        let mut containers = self.containers.write().await;
        Ok(containers
            .get_mut(container)
            .is_some_and(|blobs| blobs.remove(name).is_some()))
    }

    async fn create_container_if_absent(&self, name: &str) -> Result<String> {
        let mut containers = self.containers.write().await;
        containers.entry(name.to_string()).or_default();
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_roundtrip_and_hash_stability() {
        let gateway = MemoryGateway::new();
        gateway.create_container_if_absent("data").await.unwrap();

        let bytes = b"binary document payload";
        let first = gateway
            .upload("data", "a/file.pdf", bytes, &HashMap::new())
            .await
            .unwrap();
        let second = gateway
            .upload("data", "b/file.pdf", bytes, &HashMap::new())
            .await
            .unwrap();

        // Identical bytes hash identically on independent uploads.
        assert_eq!(first.content_hash, second.content_hash);
        assert_eq!(
            gateway.open("data", "a/file.pdf").await.unwrap(),
            bytes.to_vec()
        );
    }

    #[tokio::test]
    async fn test_upload_into_missing_container_fails() {
        let gateway = MemoryGateway::new();
        let err = gateway
            .upload("nowhere", "file.bin", b"x", &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[tokio::test]
    async fn test_metadata_attached_after_write() {
        let gateway = MemoryGateway::new();
        gateway.create_container_if_absent("data").await.unwrap();

        let mut metadata = HashMap::new();
        metadata.insert("OriginalFileName".to_string(), "report.pdf".to_string());
        gateway
            .upload("data", "file.pdf", b"x", &metadata)
            .await
            .unwrap();

        assert_eq!(
            gateway.metadata("data", "file.pdf").await.unwrap(),
            metadata
        );
    }

    #[tokio::test]
    async fn test_metadata_failure_leaves_blob() {
        let gateway = MemoryGateway::new();
        gateway.create_container_if_absent("data").await.unwrap();
        gateway.fail_metadata_attachment(true);

        let mut metadata = HashMap::new();
        metadata.insert("UserId".to_string(), "u1".to_string());
        let err = gateway
            .upload("data", "file.pdf", b"payload", &metadata)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MetadataAttachment(_, _)));
        // The primary write is not rolled back.
        assert!(gateway.blob_exists("data", "file.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_absent_returns_false() {
        let gateway = MemoryGateway::new();
        gateway.create_container_if_absent("data").await.unwrap();
        assert!(!gateway.delete("data", "ghost.pdf").await.unwrap());
        assert!(!gateway.delete("nowhere", "ghost.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_container_is_idempotent() {
        let gateway = MemoryGateway::new();
        assert_eq!(
            gateway.create_container_if_absent("data").await.unwrap(),
            "data"
        );
        assert_eq!(
            gateway.create_container_if_absent("data").await.unwrap(),
            "data"
        );
        assert!(gateway.container_exists("data").await.unwrap());
    }

    #[tokio::test]
    async fn test_container_exists_invalid_name_is_false() {
        let gateway = MemoryGateway::new();
        assert!(!gateway.container_exists("UPPER//bad name").await.unwrap());
    }
}
