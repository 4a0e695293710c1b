//! In-memory test doubles for the lifecycle suites.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use docvault_core::{
    Document, DocumentChanges, DocumentLookup, DocumentQuery, DocumentRepository,
    DocumentSettings, Result, UploadForm, UserContext,
};
use docvault_storage::{BinaryStore, MemoryGateway};

use crate::DocumentService;

/// In-memory DocumentRepository with the same filter semantics as the
/// Postgres implementation.
#[derive(Default)]
pub struct MemoryRepository {
    rows: RwLock<HashMap<Uuid, Document>>,
    fail_commits: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent commits write zero rows, simulating a failed
    /// metadata commit after a successful storage write.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    pub async fn raw(&self, public_id: Uuid) -> Option<Document> {
        self.rows.read().await.get(&public_id).cloned()
    }

    fn matches(document: &Document, lookup: &DocumentLookup) -> bool {
        if document.is_removed && !lookup.include_removed {
            return false;
        }
        if lookup.enabled_only && !document.is_enabled {
            return false;
        }
        if let Some(owner) = lookup.owned_by {
            if document.created_by != owner {
                return false;
            }
        }
        if let Some(viewer) = lookup.visible_to {
            if document.is_private && document.created_by != viewer {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl DocumentRepository for MemoryRepository {
    async fn find_document(
        &self,
        public_id: Uuid,
        lookup: DocumentLookup,
    ) -> Result<Option<Document>> {
        Ok(self
            .rows
            .read()
            .await
            .get(&public_id)
            .filter(|d| Self::matches(d, &lookup))
            .cloned())
    }

    async fn list_documents(&self, query: DocumentQuery) -> Result<Vec<Document>> {
        let rows = self.rows.read().await;
        let mut documents: Vec<Document> = rows
            .values()
            .filter(|d| !d.is_removed)
            .filter(|d| d.is_enabled || query.show_inactive)
            .filter(|d| {
                query.search.is_empty()
                    || d.remarks.contains(&query.search)
                    || d.original_name.contains(&query.search)
            })
            .filter(|d| {
                query
                    .process_name
                    .as_ref()
                    .map_or(true, |p| &d.process_name == p)
            })
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(documents)
    }

    async fn insert_document(&self, document: &Document, actor: &UserContext) -> Result<u64> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Ok(0);
        }
        let mut stored = document.clone();
        stored.modified_by = Some(actor.user_id);
        stored.modified = Some(Utc::now());
        self.rows.write().await.insert(stored.public_id, stored);
        Ok(1)
    }

    async fn update_document(
        &self,
        public_id: Uuid,
        changes: DocumentChanges,
        actor: &UserContext,
    ) -> Result<u64> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Ok(0);
        }
        let mut rows = self.rows.write().await;
        match rows.get_mut(&public_id).filter(|d| !d.is_removed) {
            Some(document) => {
                document.remarks = changes.remarks;
                document.is_enabled = changes.is_enabled;
                document.roles = changes.roles;
                document.modified_by = Some(actor.user_id);
                document.modified = Some(Utc::now());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn mark_removed(
        &self,
        public_id: Uuid,
        removed_at: DateTime<Utc>,
        actor: &UserContext,
    ) -> Result<u64> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&public_id).filter(|d| !d.is_removed) {
            Some(document) => {
                document.is_enabled = false;
                document.is_removed = true;
                document.removed = Some(removed_at);
                document.modified_by = Some(actor.user_id);
                document.modified = Some(Utc::now());
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// A service wired to in-memory storage and repository fakes.
pub struct TestService {
    pub service: DocumentService,
    pub repository: Arc<MemoryRepository>,
    pub store: Arc<BinaryStore<MemoryGateway>>,
}

pub fn test_settings() -> Arc<DocumentSettings> {
    Arc::new(DocumentSettings::new(
        "data",
        "testaccount",
        vec!["NURSE".to_string(), "DOCTOR".to_string(), "CLERK".to_string()],
    ))
}

pub fn test_service() -> TestService {
    let settings = test_settings();
    let store = Arc::new(BinaryStore::new(MemoryGateway::new(), settings.clone()));
    let repository = Arc::new(MemoryRepository::new());
    let service = DocumentService::new(store.clone(), repository.clone(), settings);
    TestService {
        service,
        repository,
        store,
    }
}

/// A simple accepted upload form.
pub fn pdf_form(process_name: &str) -> UploadForm {
    UploadForm {
        file_name: "report.pdf".to_string(),
        process_name: process_name.to_string(),
        remarks: "quarterly report".to_string(),
        roles: vec!["nurse".to_string()],
        tags: vec!["intake".to_string()],
        dcmi_type: 5,
        is_enabled: true,
    }
}

pub fn roles(list: &[&str]) -> Vec<String> {
    list.iter().map(|r| r.to_string()).collect()
}
