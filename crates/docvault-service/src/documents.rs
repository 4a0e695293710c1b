//! Document lifecycle service.
//!
//! Orchestrates PathAllocator + StorageGateway + DocumentRepository under
//! the authorization engine. Ordering contract: on create, the storage
//! write happens before the metadata commit (a metadata row must never
//! reference a blob that does not exist); on delete, the metadata update
//! happens first and blobs are never physically removed by the soft-delete
//! path. Authorization and validation outcomes are returned in the result
//! tuple; only backend failures surface as errors.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use docvault_core::{
    access, classify, is_accepted, normalize, BinaryStorage, Document, DocumentChanges,
    DocumentInformation, DocumentLookup, DocumentQuery, DocumentRepository, DocumentSettings,
    Error, Result, UploadForm, UserContext,
};

/// Message returned when a document is absent, removed, or concealed.
pub const MSG_NOT_FOUND: &str = "Document not found";
/// Message returned after a successful soft delete.
pub const MSG_DELETED: &str = "Document deleted";
/// Message returned when a non-admin attempts to delete a non-private
/// document. Safe to disclose: the record's existence is not secret.
pub const MSG_DELETE_NOT_AUTHORIZED: &str = "You are not authorized to delete documents";

/// Orchestrates the document lifecycle over pluggable storage and
/// persistence seams.
pub struct DocumentService {
    storage: Arc<dyn BinaryStorage>,
    repository: Arc<dyn DocumentRepository>,
    settings: Arc<DocumentSettings>,
}

impl DocumentService {
    pub fn new(
        storage: Arc<dyn BinaryStorage>,
        repository: Arc<dyn DocumentRepository>,
        settings: Arc<DocumentSettings>,
    ) -> Self {
        Self {
            storage,
            repository,
            settings,
        }
    }

    /// Store uploaded bytes and commit the metadata row.
    ///
    /// Storage write strictly precedes the metadata commit. A failed commit
    /// after a successful write reports `(false, ..)` and leaves the blob in
    /// place: identifiers are never reused, so the orphan can never collide
    /// with a later upload.
    pub async fn save_document(
        &self,
        data: &[u8],
        form: &UploadForm,
        caller: &UserContext,
    ) -> Result<(bool, DocumentInformation)> {
        if form.process_name.trim().is_empty() {
            return Err(Error::InvalidInput("process name must not be empty".into()));
        }
        if !is_accepted(&form.file_name) {
            return Err(Error::InvalidInput(format!(
                "file name {} has no accepted extension",
                form.file_name
            )));
        }

        let file_id = Uuid::new_v4();
        let extension = extension_of(&form.file_name);
        let content_type = classify(&extension).map(|k| k.as_str()).unwrap_or("");
        let base_path = format!("{}/{}", self.settings.storage_root, form.process_name);

        let save_path = self.storage.allocate(&base_path, file_id).await?;
        let file_name = format!("{}{}", file_id, extension.to_lowercase());
        let document_storage = format!("{}/{}", save_path, file_name);
        // The stored location excludes the base path: shard segments plus
        // the terminal file name.
        let location = relative_location(&document_storage, &base_path);

        debug!(identifier = %document_storage, "saving file");

        let mut metadata = HashMap::new();
        metadata.insert("OriginalFileName".to_string(), form.file_name.clone());
        metadata.insert("UserId".to_string(), caller.user_id.to_string());
        metadata.insert("DcmiType".to_string(), form.dcmi_type.to_string());
        metadata.insert("ContentType".to_string(), content_type.to_string());

        self.storage
            .create_document(&document_storage, data, &metadata)
            .await?;

        let document = Document {
            public_id: Uuid::new_v4(),
            location,
            original_name: form.file_name.clone(),
            extension,
            extension_group: content_type.to_string(),
            size: data.len() as i64,
            remarks: form.remarks.clone(),
            roles: normalize::valid_roles(&form.roles, &self.settings),
            tags: normalize::valid_tags(&form.tags),
            process_name: form.process_name.clone(),
            dcmi_type: form.dcmi_type,
            created_by: caller.user_id,
            created: Utc::now(),
            removed: None,
            modified_by: None,
            modified: None,
            is_private: true,
            is_enabled: form.is_enabled,
            is_removed: false,
        };

        let committed = self.repository.insert_document(&document, caller).await?;
        if committed == 0 {
            warn!(document_id = %document.public_id, "metadata commit wrote no rows, blob left in place");
        }
        Ok((committed > 0, DocumentInformation::from(&document)))
    }

    /// Fetch one document's projection by public id.
    ///
    /// Admins see any non-removed row; other callers see enabled rows they
    /// own or that are non-private. Absent and concealed rows are the same
    /// `(false, ..)` result.
    pub async fn get_document_information(
        &self,
        public_id: Uuid,
        caller: &UserContext,
    ) -> Result<(bool, DocumentInformation)> {
        let lookup = if caller.is_admin {
            DocumentLookup::any()
        } else {
            DocumentLookup::visible_to(caller.user_id)
        };
        match self.repository.find_document(public_id, lookup).await? {
            Some(document) => Ok((true, DocumentInformation::from(&document))),
            None => Ok((false, DocumentInformation::default())),
        }
    }

    /// Search document records visible to the caller.
    ///
    /// The repository filters removed (always) and disabled (unless
    /// `show_inactive`) rows and orders by creation time descending; the
    /// per-record access rule then decides inclusion, short-circuiting on
    /// the first caller role that matches.
    pub async fn find_documents(
        &self,
        search: &str,
        for_roles: &[String],
        process_name: Option<String>,
        show_inactive: bool,
        caller: &UserContext,
    ) -> Result<Vec<DocumentInformation>> {
        let documents = self
            .repository
            .list_documents(DocumentQuery {
                search: search.to_string(),
                process_name,
                show_inactive,
            })
            .await?;

        let result: Vec<DocumentInformation> = documents
            .iter()
            .filter(|d| access::can_view(caller, d, for_roles).is_allowed())
            .map(DocumentInformation::from)
            .collect();
        debug!(result_count = result.len(), "document search");
        Ok(result)
    }

    /// Apply the authorized update fields (remarks, enabled flag, roles).
    ///
    /// Non-admin callers can only reach rows they own; everyone else gets
    /// the same `(false, ..)` as an absent record.
    pub async fn update_document(
        &self,
        public_id: Uuid,
        form: &UploadForm,
        caller: &UserContext,
    ) -> Result<(bool, DocumentInformation)> {
        let Some(mut document) = self
            .repository
            .find_document(public_id, DocumentLookup::any())
            .await?
        else {
            return Ok((false, DocumentInformation::default()));
        };
        if !access::can_update(caller, &document).is_allowed() {
            return Ok((false, DocumentInformation::default()));
        }

        let changes = DocumentChanges {
            remarks: form.remarks.clone(),
            is_enabled: form.is_enabled,
            roles: normalize::valid_roles(&form.roles, &self.settings),
        };
        let committed = self
            .repository
            .update_document(public_id, changes.clone(), caller)
            .await?;

        document.remarks = changes.remarks;
        document.is_enabled = changes.is_enabled;
        document.roles = changes.roles;
        Ok((committed > 0, DocumentInformation::from(&document)))
    }

    /// Soft-delete a document record.
    ///
    /// The metadata row is updated first and the blob is never touched on
    /// this path. Messages are exact: concealment for private rows, an
    /// explicit refusal for non-private rows.
    pub async fn delete_document(
        &self,
        public_id: Uuid,
        caller: &UserContext,
    ) -> Result<(bool, String)> {
        let Some(document) = self
            .repository
            .find_document(public_id, DocumentLookup::any())
            .await?
        else {
            return Ok((false, MSG_NOT_FOUND.to_string()));
        };

        match access::can_delete(caller, &document) {
            access::AccessDecision::Allowed => {}
            access::AccessDecision::NotFound => {
                return Ok((false, MSG_NOT_FOUND.to_string()));
            }
            access::AccessDecision::NotAuthorized => {
                return Ok((false, MSG_DELETE_NOT_AUTHORIZED.to_string()));
            }
        }

        let updated = self
            .repository
            .mark_removed(public_id, Utc::now(), caller)
            .await?;
        info!(document_id = %public_id, user_id = %caller.user_id, "document deleted");
        Ok((updated > 0, MSG_DELETED.to_string()))
    }

    /// Physically remove a document's blob. Admin-only; distinct from the
    /// soft-delete path and separately authorized.
    pub async fn remove_document_binary(
        &self,
        public_id: Uuid,
        caller: &UserContext,
    ) -> Result<(bool, String)> {
        if !caller.is_admin {
            return Ok((false, MSG_DELETE_NOT_AUTHORIZED.to_string()));
        }
        // Audit lookup: the blob of an already soft-deleted row may still
        // need physical removal.
        let Some(document) = self
            .repository
            .find_document(public_id, DocumentLookup::audit())
            .await?
        else {
            return Ok((false, MSG_NOT_FOUND.to_string()));
        };

        let identifier = self.storage_identifier(&document);
        let removed = self.storage.delete_document(&identifier).await?;
        info!(document_id = %public_id, identifier = %identifier, removed, "document blob removal");
        Ok((removed, MSG_DELETED.to_string()))
    }

    /// Storage health probe passthrough. Never fails.
    pub async fn health(&self) -> String {
        self.storage.health().await
    }

    /// Full storage identifier for a row: the base path the location was
    /// made relative to, re-joined with the stored location.
    fn storage_identifier(&self, document: &Document) -> String {
        format!(
            "{}/{}/{}",
            self.settings.storage_root, document.process_name, document.location
        )
    }
}

/// Extension of a file name including the leading dot, empty when absent.
fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(n) => file_name[n..].to_string(),
        None => String::new(),
    }
}

/// Strip the (normalized) base path prefix from an allocated storage path.
fn relative_location(storage_path: &str, base_path: &str) -> String {
    let normalized_base: String = base_path
        .split(['\\', '/'])
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join("/");
    storage_path
        .strip_prefix(&format!("{}/", normalized_base))
        .unwrap_or(storage_path)
        .to_string()
}
