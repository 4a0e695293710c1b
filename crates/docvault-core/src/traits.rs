//! Trait seams for docvault abstractions.
//!
//! These traits define the boundaries the core logic depends on: the
//! object-storage backend ([`StorageGateway`]), the binary-storage service
//! built on top of it ([`BinaryStorage`]), and the metadata persistence
//! layer ([`DocumentRepository`]). Concrete adapters live in the storage and
//! db crates; tests run against in-memory implementations of the same
//! traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::Result;
use crate::identity::UserContext;
use crate::models::Document;

/// Result of a successful blob upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Backend location of the written blob (URI-style).
    pub location: String,
    /// Content hash computed by the backend over the uploaded bytes.
    /// Stable for identical bytes.
    pub content_hash: String,
}

/// Object-storage backend contract.
///
/// Container names are single lower-case tokens; object names may contain
/// forward-slash separators for nested logical paths. Idempotency of
/// `create_container_if_absent` is the concurrency-correctness mechanism:
/// concurrent callers for the same name must both succeed.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Whether the container exists. Must not fail for a syntactically
    /// invalid container name; such names report `false`.
    async fn container_exists(&self, container: &str) -> Result<bool>;

    /// Whether the named blob exists within the container.
    async fn blob_exists(&self, container: &str, name: &str) -> Result<bool>;

    /// Upload bytes and return the backend location plus content hash.
    ///
    /// Non-empty metadata is attached after the primary write completes; a
    /// metadata attachment failure surfaces as
    /// [`crate::Error::MetadataAttachment`] without rolling back the blob.
    async fn upload(
        &self,
        container: &str,
        name: &str,
        data: &[u8],
        metadata: &HashMap<String, String>,
    ) -> Result<UploadReceipt>;

    /// Read the blob's bytes. Fails with `Error::NotFound` if absent.
    async fn open(&self, container: &str, name: &str) -> Result<Vec<u8>>;

    /// Delete the blob. Returns `false`, not an error, when it did not exist.
    async fn delete(&self, container: &str, name: &str) -> Result<bool>;

    /// Create the container when absent. Idempotent; returns the container
    /// identifier either way.
    async fn create_container_if_absent(&self, name: &str) -> Result<String>;
}

/// Binary-storage service consumed by the document lifecycle layer.
///
/// Wraps a [`StorageGateway`] with path allocation, identifier splitting,
/// and the health probe.
#[async_trait]
pub trait BinaryStorage: Send + Sync {
    /// Compute a deterministic, depth-bounded storage path for a fresh
    /// document under `base_path` and ensure its top-level container exists.
    async fn allocate(&self, base_path: &str, id: Uuid) -> Result<String>;

    /// Write document bytes at the identifier produced by a prior
    /// allocation. Fails with `Error::MissingContainer` when the container
    /// does not exist.
    async fn create_document(
        &self,
        identifier: &str,
        data: &[u8],
        metadata: &HashMap<String, String>,
    ) -> Result<UploadReceipt>;

    /// Read the document bytes back.
    async fn open_document(&self, identifier: &str) -> Result<Vec<u8>>;

    /// Whether the document blob exists. A missing container reads as `false`.
    async fn document_exists(&self, identifier: &str) -> Result<bool>;

    /// Physically remove the blob. Returns `false` when it did not exist.
    async fn delete_document(&self, identifier: &str) -> Result<bool>;

    /// Health probe. Never fails: any backend problem becomes part of the
    /// returned status text.
    async fn health(&self) -> String;
}

/// Visibility filters for a single-record lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentLookup {
    /// Include soft-deleted rows (admin audit paths only).
    pub include_removed: bool,
    /// Restrict to enabled rows.
    pub enabled_only: bool,
    /// Restrict to rows created by this user.
    pub owned_by: Option<Uuid>,
    /// Restrict to rows that are either non-private or owned by this user.
    pub visible_to: Option<Uuid>,
}

impl DocumentLookup {
    /// Unrestricted lookup excluding removed rows (admin fetch).
    pub fn any() -> Self {
        Self::default()
    }

    /// Admin audit lookup: removed rows included.
    pub fn audit() -> Self {
        Self {
            include_removed: true,
            ..Self::default()
        }
    }

    /// Non-admin fetch: enabled rows the user owns or that are public.
    pub fn visible_to(user_id: Uuid) -> Self {
        Self {
            enabled_only: true,
            visible_to: Some(user_id),
            ..Self::default()
        }
    }

    /// Non-admin update lookup: rows the user owns.
    pub fn owned_by(user_id: Uuid) -> Self {
        Self {
            owned_by: Some(user_id),
            ..Self::default()
        }
    }
}

/// Filters for the search/list operation. Removed rows are always excluded.
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    /// Substring matched against remarks and original file name; empty
    /// matches everything.
    pub search: String,
    /// Restrict to one logical process.
    pub process_name: Option<String>,
    /// Include disabled rows.
    pub show_inactive: bool,
}

/// Mutable fields applied by the authorized update path.
#[derive(Debug, Clone, Default)]
pub struct DocumentChanges {
    pub remarks: String,
    pub is_enabled: bool,
    /// Already validated against the settings' valid-roles table.
    pub roles: Vec<String>,
}

/// Persistence of document metadata rows.
///
/// Every mutation carries the acting user for audit attribution and returns
/// the number of rows written, mirroring a commit-with-audit unit of work.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Find one row by public id, subject to visibility filters.
    async fn find_document(
        &self,
        public_id: Uuid,
        lookup: DocumentLookup,
    ) -> Result<Option<Document>>;

    /// Query rows matching the filters, ordered by creation time descending.
    async fn list_documents(&self, query: DocumentQuery) -> Result<Vec<Document>>;

    /// Insert a new row.
    async fn insert_document(&self, document: &Document, actor: &UserContext) -> Result<u64>;

    /// Apply the authorized update fields to an existing row.
    async fn update_document(
        &self,
        public_id: Uuid,
        changes: DocumentChanges,
        actor: &UserContext,
    ) -> Result<u64>;

    /// Flip the soft-delete flags: `is_enabled = false, is_removed = true,
    /// removed = removed_at`. Rows already removed are not touched.
    async fn mark_removed(
        &self,
        public_id: Uuid,
        removed_at: DateTime<Utc>,
        actor: &UserContext,
    ) -> Result<u64>;
}
