//! Filesystem storage gateway.
//!
//! The real backend adapter: containers are first-level directories under a
//! root path, object names map to nested files below them. Writes are
//! atomic (temp file + rename) and blob metadata is kept in a JSON sidecar
//! written after the primary write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use docvault_core::{Error, Result, StorageGateway, UploadReceipt};

use crate::content_hash;

const METADATA_SUFFIX: &str = ".meta.json";
const TEMP_SUFFIX: &str = ".tmp";

/// Filesystem-backed [`StorageGateway`].
pub struct FsGateway {
    root: PathBuf,
}

impl FsGateway {
    /// Create a gateway rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn container_path(&self, container: &str) -> PathBuf {
        self.root.join(container)
    }

    fn blob_path(&self, container: &str, name: &str) -> Result<PathBuf> {
        if !is_valid_container(container) {
            return Err(Error::InvalidInput(format!(
                "invalid container name: {}",
                container
            )));
        }
        if !is_valid_object_name(name) {
            return Err(Error::InvalidInput(format!("invalid object name: {}", name)));
        }
        let mut path = self.container_path(container);
        for segment in name.split('/') {
            path.push(segment);
        }
        Ok(path)
    }

    async fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                warn!(parent = %parent.display(), error = %e, "fs_gateway: create_dir_all failed");
                e
            })?;
        }

        // Appended suffix, not a replaced extension: `a.pdf` and `a.txt`
        // must not share a temp file, and a blob literally named `*.tmp`
        // must not be clobbered.
        let temp_path = suffixed_path(path, TEMP_SUFFIX);
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&temp_path, path).await?;
        Ok(())
    }
}

/// A container name is a single lower-case token with no separators.
fn is_valid_container(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    if name == crate::path::ROOT_CONTAINER {
        return true;
    }
    !name.contains(['/', '\\']) && !name.chars().any(|c| c.is_uppercase())
}

fn is_valid_object_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

#[async_trait]
impl StorageGateway for FsGateway {
    async fn container_exists(&self, container: &str) -> Result<bool> {
        // Malformed names report absent rather than failing.
        if !is_valid_container(container) {
            return Ok(false);
        }
        Ok(fs::try_exists(self.container_path(container)).await?)
    }

    async fn blob_exists(&self, container: &str, name: &str) -> Result<bool> {
        let path = self.blob_path(container, name)?;
        Ok(fs::try_exists(path).await?)
    }

    async fn upload(
        &self,
        container: &str,
        name: &str,
        data: &[u8],
        metadata: &HashMap<String, String>,
    ) -> Result<UploadReceipt> {
        let path = self.blob_path(container, name)?;
        if !fs::try_exists(self.container_path(container)).await? {
            return Err(Error::Storage(format!(
                "container {} does not exist",
                container
            )));
        }

        debug!(container, name, size_bytes = data.len(), "fs_gateway: upload");
        Self::write_atomic(&path, data).await?;

        let location = format!("file://{}", path.display());

        if !metadata.is_empty() {
            // Attached after the primary write; a failure here surfaces as a
            // distinct error without rolling the blob back.
            let sidecar = sidecar_path(&path);
            let encoded = serde_json::to_vec(metadata)
                .map_err(|e| Error::MetadataAttachment(location.clone(), e.to_string()))?;
            Self::write_atomic(&sidecar, &encoded)
                .await
                .map_err(|e| Error::MetadataAttachment(location.clone(), e.to_string()))?;
        }

        Ok(UploadReceipt {
            location,
            content_hash: content_hash(data),
        })
    }

    async fn open(&self, container: &str, name: &str) -> Result<Vec<u8>> {
        let path = self.blob_path(container, name)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("{}/{}", container, name)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, container: &str, name: &str) -> Result<bool> {
        let path = self.blob_path(container, name)?;
        if !fs::try_exists(&path).await? {
            return Ok(false);
        }
        fs::remove_file(&path).await?;
        let sidecar = sidecar_path(&path);
        if fs::try_exists(&sidecar).await? {
            fs::remove_file(&sidecar).await?;
        }
        Ok(true)
    }

    async fn create_container_if_absent(&self, name: &str) -> Result<String> {
        if !is_valid_container(name) {
            return Err(Error::InvalidInput(format!(
                "invalid container name: {}",
                name
            )));
        }
        // create_dir_all succeeds when the directory already exists, so
        // concurrent callers for the same name both succeed.
        fs::create_dir_all(self.container_path(name)).await?;
        Ok(name.to_string())
    }
}

fn sidecar_path(path: &Path) -> PathBuf {
    suffixed_path(path, METADATA_SUFFIX)
}

fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = FsGateway::new(dir.path());
        gateway.create_container_if_absent("data").await.unwrap();

        let bytes = b"fs payload";
        let receipt = gateway
            .upload("data", "forms/01/file.pdf", bytes, &HashMap::new())
            .await
            .unwrap();
        assert!(!receipt.content_hash.is_empty());
        assert_eq!(
            gateway.open("data", "forms/01/file.pdf").await.unwrap(),
            bytes.to_vec()
        );
    }

    #[tokio::test]
    async fn test_open_absent_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = FsGateway::new(dir.path());
        gateway.create_container_if_absent("data").await.unwrap();

        let err = gateway.open("data", "ghost.pdf").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_container_exists_handles_invalid_names() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = FsGateway::new(dir.path());

        assert!(!gateway.container_exists("").await.unwrap());
        assert!(!gateway.container_exists("..").await.unwrap());
        assert!(!gateway.container_exists("Not/Valid").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_returns_false_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = FsGateway::new(dir.path());
        gateway.create_container_if_absent("data").await.unwrap();

        assert!(!gateway.delete("data", "ghost.pdf").await.unwrap());
        gateway
            .upload("data", "real.pdf", b"x", &HashMap::new())
            .await
            .unwrap();
        assert!(gateway.delete("data", "real.pdf").await.unwrap());
        assert!(!gateway.blob_exists("data", "real.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn test_object_name_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = FsGateway::new(dir.path());
        gateway.create_container_if_absent("data").await.unwrap();

        let err = gateway
            .upload("data", "../escape.bin", b"x", &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_upload_does_not_clobber_sibling_blobs() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = FsGateway::new(dir.path());
        gateway.create_container_if_absent("data").await.unwrap();

        // A blob whose real name ends in .tmp must survive a later upload
        // of a sibling with the same stem.
        gateway
            .upload("data", "report.tmp", b"keep me", &HashMap::new())
            .await
            .unwrap();
        gateway
            .upload("data", "report.pdf", b"sibling", &HashMap::new())
            .await
            .unwrap();

        assert_eq!(
            gateway.open("data", "report.tmp").await.unwrap(),
            b"keep me".to_vec()
        );
        assert_eq!(
            gateway.open("data", "report.pdf").await.unwrap(),
            b"sibling".to_vec()
        );
    }

    #[tokio::test]
    async fn test_metadata_sidecar_written() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = FsGateway::new(dir.path());
        gateway.create_container_if_absent("data").await.unwrap();

        let mut metadata = HashMap::new();
        metadata.insert("ContentType".to_string(), "pdf".to_string());
        gateway
            .upload("data", "file.pdf", b"x", &metadata)
            .await
            .unwrap();

        let sidecar = dir.path().join("data").join("file.pdf.meta.json");
        let stored: HashMap<String, String> =
            serde_json::from_slice(&std::fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(stored, metadata);
    }
}
