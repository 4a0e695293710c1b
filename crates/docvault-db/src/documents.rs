//! Document repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use docvault_core::{
    Document, DocumentChanges, DocumentLookup, DocumentQuery, DocumentRepository, Result,
    UserContext,
};

use crate::escape_like;

const DOCUMENT_COLUMNS: &str = "public_id, location, original_name, extension, extension_group, \
     size, remarks, roles, tags, process_name, dcmi_type, created_by, created, removed, \
     modified_by, modified, is_private, is_enabled, is_removed";

/// PostgreSQL implementation of DocumentRepository.
///
/// Roles and tags travel as `Vec<String>` in the model and are stored as
/// `;`-joined text columns.
pub struct PgDocumentRepository {
    pool: Pool<Postgres>,
}

impl PgDocumentRepository {
    /// Create a new PgDocumentRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn join_tokens(tokens: &[String]) -> String {
    tokens.join(";")
}

fn split_tokens(joined: &str) -> Vec<String> {
    joined
        .split(';')
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn document_from_row(row: &PgRow) -> Result<Document> {
    Ok(Document {
        public_id: row.try_get("public_id")?,
        location: row.try_get("location")?,
        original_name: row.try_get("original_name")?,
        extension: row.try_get("extension")?,
        extension_group: row.try_get("extension_group")?,
        size: row.try_get("size")?,
        remarks: row.try_get("remarks")?,
        roles: split_tokens(row.try_get("roles")?),
        tags: split_tokens(row.try_get("tags")?),
        process_name: row.try_get("process_name")?,
        dcmi_type: row.try_get("dcmi_type")?,
        created_by: row.try_get("created_by")?,
        created: row.try_get("created")?,
        removed: row.try_get("removed")?,
        modified_by: row.try_get("modified_by")?,
        modified: row.try_get("modified")?,
        is_private: row.try_get("is_private")?,
        is_enabled: row.try_get("is_enabled")?,
        is_removed: row.try_get("is_removed")?,
    })
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn find_document(
        &self,
        public_id: Uuid,
        lookup: DocumentLookup,
    ) -> Result<Option<Document>> {
        let sql = format!(
            r#"SELECT {DOCUMENT_COLUMNS} FROM document
               WHERE public_id = $1
                 AND (is_removed = FALSE OR $2)
                 AND (is_enabled = TRUE OR NOT $3)
                 AND ($4::uuid IS NULL OR created_by = $4)
                 AND ($5::uuid IS NULL OR is_private = FALSE OR created_by = $5)"#
        );
        let row = sqlx::query(&sql)
            .bind(public_id)
            .bind(lookup.include_removed)
            .bind(lookup.enabled_only)
            .bind(lookup.owned_by)
            .bind(lookup.visible_to)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(document_from_row).transpose()
    }

    async fn list_documents(&self, query: DocumentQuery) -> Result<Vec<Document>> {
        let term = if query.search.is_empty() {
            String::new()
        } else {
            format!("%{}%", escape_like(&query.search))
        };
        let sql = format!(
            r#"SELECT {DOCUMENT_COLUMNS} FROM document
               WHERE is_removed = FALSE
                 AND (is_enabled = TRUE OR $1)
                 AND ($2 = '' OR remarks LIKE $2 OR original_name LIKE $2)
                 AND ($3::text IS NULL OR process_name = $3)
               ORDER BY created DESC"#
        );
        let rows = sqlx::query(&sql)
            .bind(query.show_inactive)
            .bind(&term)
            .bind(&query.process_name)
            .fetch_all(&self.pool)
            .await?;

        debug!(result_count = rows.len(), "document list query");
        rows.iter().map(document_from_row).collect()
    }

    async fn insert_document(&self, document: &Document, actor: &UserContext) -> Result<u64> {
        let result = sqlx::query(
            r#"INSERT INTO document
               (public_id, location, original_name, extension, extension_group, size,
                remarks, roles, tags, process_name, dcmi_type, created_by, created,
                modified_by, modified, is_private, is_enabled, is_removed)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                       $16, $17, FALSE)"#,
        )
        .bind(document.public_id)
        .bind(&document.location)
        .bind(&document.original_name)
        .bind(&document.extension)
        .bind(&document.extension_group)
        .bind(document.size)
        .bind(&document.remarks)
        .bind(join_tokens(&document.roles))
        .bind(join_tokens(&document.tags))
        .bind(&document.process_name)
        .bind(document.dcmi_type)
        .bind(document.created_by)
        .bind(document.created)
        .bind(actor.user_id)
        .bind(Utc::now())
        .bind(document.is_private)
        .bind(document.is_enabled)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn update_document(
        &self,
        public_id: Uuid,
        changes: DocumentChanges,
        actor: &UserContext,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"UPDATE document
               SET remarks = $2, is_enabled = $3, roles = $4, modified_by = $5, modified = $6
               WHERE public_id = $1 AND is_removed = FALSE"#,
        )
        .bind(public_id)
        .bind(&changes.remarks)
        .bind(changes.is_enabled)
        .bind(join_tokens(&changes.roles))
        .bind(actor.user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn mark_removed(
        &self,
        public_id: Uuid,
        removed_at: DateTime<Utc>,
        actor: &UserContext,
    ) -> Result<u64> {
        // Removed rows are terminal; the guard keeps the first removal's
        // timestamp and attribution.
        let result = sqlx::query(
            r#"UPDATE document
               SET is_enabled = FALSE, is_removed = TRUE, removed = $2,
                   modified_by = $3, modified = $4
               WHERE public_id = $1 AND is_removed = FALSE"#,
        )
        .bind(public_id)
        .bind(removed_at)
        .bind(actor.user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
