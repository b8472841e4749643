#![cfg(feature = "postgres-tests")]

use sqlx::PgPool;

use names_core::domain::{LearningMode, QuizMode};
use names_core::ports::{SettingsStore, UserRegistry};
use names_storage::{SettingsRepository, UserRepository};

#[sqlx::test(migrations = "./migrations")]
async fn updates_persist_and_reset_restores_defaults(pool: PgPool) -> Result<(), sqlx::Error> {
    let users = UserRepository::new(pool.clone());
    let settings = SettingsRepository::new(pool.clone());

    users
        .ensure_user("learner", "chat")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    settings
        .update_names_per_day("learner", 3)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    settings
        .update_quiz_mode("learner", QuizMode::Review)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    settings
        .update_learning_mode("learner", LearningMode::Free)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    settings
        .update_timezone("learner", "UTC+3")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let row = settings
        .get_or_create("learner")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    assert_eq!(row.names_per_day, 3);
    assert_eq!(row.quiz_mode, QuizMode::Review);
    assert_eq!(row.learning_mode, LearningMode::Free);
    assert_eq!(row.timezone, "UTC+3");

    let reset = settings
        .reset_to_defaults("learner")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    assert_eq!(reset.names_per_day, 1);
    assert_eq!(reset.timezone, "UTC");

    Ok(())
}
