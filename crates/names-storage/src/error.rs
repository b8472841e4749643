//! Storage errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),

    #[error("query error: {0}")]
    Query(#[source] sqlx::Error),

    #[error("catalog error: {0}")]
    Catalog(String),
}
