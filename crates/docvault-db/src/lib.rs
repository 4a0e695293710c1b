//! # docvault-db
//!
//! PostgreSQL persistence layer for docvault document metadata.
//!
//! Provides connection pool management and the [`PgDocumentRepository`]
//! implementation of [`DocumentRepository`](docvault_core::DocumentRepository).
//! Roles and tags are stored as `;`-joined normalized tokens in text
//! columns, matching the row shape the service layer expects.

pub mod documents;
pub mod pool;


// Test fixtures for integration tests
// Note: always compiled so downstream crates can use them in their tests.
pub mod test_fixtures;

// Re-export core types
pub use docvault_core::*;

pub use documents::PgDocumentRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Run pending migrations against the given pool.
pub async fn migrate(pool: &sqlx::PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
    Ok(())
}
