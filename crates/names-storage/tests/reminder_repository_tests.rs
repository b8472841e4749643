#![cfg(feature = "postgres-tests")]

use chrono::Utc;
use sqlx::PgPool;

use names_core::ports::{ReminderStore, UserRegistry};
use names_storage::{ReminderRepository, UserRepository};

#[sqlx::test(migrations = "./migrations")]
async fn ensure_config_seeds_defaults_and_set_interval_persists(
    pool: PgPool,
) -> Result<(), sqlx::Error> {
    let users = UserRepository::new(pool.clone());
    let reminders = ReminderRepository::new(pool.clone());

    users
        .ensure_user("learner", "chat")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let defaults = reminders
        .ensure_config("learner")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    assert!(defaults.is_enabled);

    let updated = reminders
        .set_interval("learner", 4)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    assert_eq!(updated.interval_hours, 4);

    reminders
        .set_enabled("learner", false)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    let disabled = reminders
        .get_config("learner")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?
        .expect("config should exist");
    assert!(!disabled.is_enabled);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn reminders_due_excludes_future_next_send_at(pool: PgPool) -> Result<(), sqlx::Error> {
    let users = UserRepository::new(pool.clone());
    let reminders = ReminderRepository::new(pool.clone());

    users
        .ensure_user("learner", "chat")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    reminders
        .ensure_config("learner")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let now = Utc::now();

    // Fresh config has next_send_at = NULL, which sorts first and counts as due.
    let due = reminders
        .reminders_due(now, 10, 0)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    assert_eq!(due.len(), 1);

    reminders
        .reschedule("learner", now + chrono::Duration::hours(2))
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let due_after = reminders
        .reminders_due(now, 10, 0)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    assert!(due_after.is_empty());

    Ok(())
}
