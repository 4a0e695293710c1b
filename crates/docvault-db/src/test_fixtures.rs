//! Test fixtures for database integration tests.
//!
//! The test database URL is taken from the `DATABASE_URL` environment
//! variable. Repository integration tests are skipped when it is unset so
//! the suite runs without a live Postgres.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::documents::PgDocumentRepository;
use crate::pool::create_pool;
use docvault_core::Document;

/// Connected test database with migrations applied.
pub struct TestDatabase {
    pub pool: PgPool,
    pub documents: PgDocumentRepository,
}

impl TestDatabase {
    /// Connect using `DATABASE_URL`, returning `None` when it is unset.
    ///
    /// Panics on connection or migration failure: a configured but broken
    /// test database is a setup error, not a skip.
    pub async fn try_new() -> Option<Self> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = create_pool(&url).await.expect("connect test database");
        crate::migrate(&pool).await.expect("run migrations");
        Some(Self {
            documents: PgDocumentRepository::new(pool.clone()),
            pool,
        })
    }

    /// Remove rows created by a test run.
    pub async fn cleanup(&self, created_by: Uuid) {
        sqlx::query("DELETE FROM document WHERE created_by = $1")
            .bind(created_by)
            .execute(&self.pool)
            .await
            .expect("cleanup test rows");
    }
}

/// A minimal valid document row for tests.
pub fn test_document(created_by: Uuid) -> Document {
    let public_id = Uuid::new_v4();
    Document {
        public_id,
        location: format!("01/02/03/04/{}.pdf", public_id),
        original_name: "report.pdf".to_string(),
        extension: ".pdf".to_string(),
        extension_group: "pdf".to_string(),
        size: 42,
        remarks: "fixture".to_string(),
        roles: vec!["NURSE".to_string()],
        tags: vec!["INTAKE".to_string()],
        process_name: "forms".to_string(),
        dcmi_type: 0,
        created_by,
        created: Utc::now(),
        removed: None,
        modified_by: None,
        modified: None,
        is_private: false,
        is_enabled: true,
        is_removed: false,
    }
}
