//! Postgres-backed adapters for every `names-core` port.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod catalog;
pub mod error;
pub mod plan_repository;
pub mod progress_repository;
pub mod quiz_repository;
pub mod reminder_repository;
pub mod settings_repository;
pub mod transactor;
pub mod user_repository;

pub use catalog::JsonCatalog;
pub use error::StorageError;
pub use plan_repository::PlanRepository;
pub use progress_repository::ProgressRepository;
pub use quiz_repository::QuizRepository;
pub use reminder_repository::ReminderRepository;
pub use settings_repository::SettingsRepository;
pub use transactor::PgTransactor;
pub use user_repository::UserRepository;

/// Creates a bounded Postgres connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, StorageError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(StorageError::Connection)
}

/// Runs the embedded migration set against `pool`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(StorageError::Migration)
}

/// Cheap liveness probe for health checks.
pub async fn check_connection(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(StorageError::Query)?;
    Ok(())
}
