//! Binary-storage service over a [`StorageGateway`].
//!
//! Ties shard-path allocation, identifier splitting, and the health probe to
//! a concrete backend. The document lifecycle layer consumes this through
//! the [`BinaryStorage`] trait so tests can swap in the in-memory gateway.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use docvault_core::{
    BinaryStorage, DocumentSettings, Error, Result, StorageGateway, UploadReceipt,
};

use crate::path::{allocate_path, split_identifier, ROOT_CONTAINER};

/// Binary document store backed by an object-storage gateway.
pub struct BinaryStore<G> {
    gateway: G,
    settings: Arc<DocumentSettings>,
}

impl<G: StorageGateway> BinaryStore<G> {
    pub fn new(gateway: G, settings: Arc<DocumentSettings>) -> Self {
        Self { gateway, settings }
    }

    /// The underlying gateway, for callers that need raw blob access.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    async fn ensure_root_container(&self) -> Result<()> {
        let created = self.gateway.create_container_if_absent(ROOT_CONTAINER).await?;
        info!(
            container = ROOT_CONTAINER,
            account = %self.settings.account_name,
            created = %created,
            "created root container"
        );
        Ok(())
    }
}

#[async_trait]
impl<G: StorageGateway> BinaryStorage for BinaryStore<G> {
    async fn allocate(&self, base_path: &str, id: Uuid) -> Result<String> {
        let path = allocate_path(base_path, id)?;
        let (container, _) = split_identifier(&path)?;
        // Races between concurrent allocations under the same base path are
        // resolved by the backend's idempotent create, not by locking.
        self.gateway.create_container_if_absent(&container).await?;
        debug!(op = "allocate", container = %container, identifier = %path, "allocated storage path");
        Ok(path)
    }

    async fn create_document(
        &self,
        identifier: &str,
        data: &[u8],
        metadata: &HashMap<String, String>,
    ) -> Result<UploadReceipt> {
        let (container, name) = split_identifier(identifier)?;
        if !self.gateway.container_exists(&container).await? {
            return Err(Error::MissingContainer(container));
        }
        debug!(op = "create_document", container = %container, identifier = %identifier, size_bytes = data.len(), "uploading document");
        self.gateway.upload(&container, &name, data, metadata).await
    }

    async fn open_document(&self, identifier: &str) -> Result<Vec<u8>> {
        let (container, name) = split_identifier(identifier)?;
        self.gateway.open(&container, &name).await
    }

    async fn document_exists(&self, identifier: &str) -> Result<bool> {
        let (container, name) = split_identifier(identifier)?;
        if !self.gateway.container_exists(&container).await? {
            return Ok(false);
        }
        self.gateway.blob_exists(&container, &name).await
    }

    async fn delete_document(&self, identifier: &str) -> Result<bool> {
        let (container, name) = split_identifier(identifier)?;
        debug!(op = "delete_document", container = %container, identifier = %identifier, "deleting document blob");
        self.gateway.delete(&container, &name).await
    }

    /// Never fails past this boundary: any backend problem becomes part of
    /// the returned status text.
    async fn health(&self) -> String {
        if self.settings.account_name.is_empty() {
            return "Client has no account".to_string();
        }

        match self.gateway.container_exists(ROOT_CONTAINER).await {
            Ok(true) => "Healthy".to_string(),
            Ok(false) => match self.ensure_root_container().await {
                Ok(()) => "Healthy".to_string(),
                Err(e) => format!("Could not create root container: {}", e),
            },
            Err(e) => format!("Storage unreachable: {}", e),
        }
    }
}
