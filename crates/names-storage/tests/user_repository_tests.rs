#![cfg(feature = "postgres-tests")]

use sqlx::PgPool;

use names_core::ports::{SettingsStore, UserRegistry};
use names_storage::{SettingsRepository, UserRepository};

#[sqlx::test(migrations = "./migrations")]
async fn ensure_user_is_idempotent_and_seeds_default_settings(
    pool: PgPool,
) -> Result<(), sqlx::Error> {
    let users = UserRepository::new(pool.clone());
    let settings = SettingsRepository::new(pool.clone());

    let first = users
        .ensure_user("user-1", "chat-1")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    let second = users
        .ensure_user("user-1", "chat-1")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    assert!(first);
    assert!(!second);

    let row = settings
        .get_or_create("user-1")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    assert_eq!(row.names_per_day, 1);

    Ok(())
}
