#![cfg(feature = "postgres-tests")]

use chrono::Utc;
use sqlx::PgPool;

use names_core::domain::{Phase, Progress, CATALOG_SIZE};
use names_core::ports::{ProgressStore, UserRegistry};
use names_storage::{ProgressRepository, UserRepository};

#[sqlx::test(migrations = "./migrations")]
async fn names_for_introduction_shrinks_as_progress_rows_are_marked(
    pool: PgPool,
) -> Result<(), sqlx::Error> {
    let users = UserRepository::new(pool.clone());
    let progress = ProgressRepository::new(pool.clone());

    users
        .ensure_user("learner", "chat")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let before = progress
        .names_for_introduction("learner", CATALOG_SIZE as u32)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    assert_eq!(before.len(), CATALOG_SIZE);
    assert_eq!(before[0], 1);

    let now = Utc::now();
    progress
        .mark_introduced("learner", 1, now)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let after = progress
        .names_for_introduction("learner", CATALOG_SIZE as u32)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    assert_eq!(after.len(), CATALOG_SIZE - 1);
    assert!(!after.contains(&1));

    let row = progress
        .get("learner", 1)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?
        .expect("progress row should exist after mark_introduced");
    assert_eq!(row.phase, Phase::New);
    assert_eq!(row.streak, 0);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn upsert_preserves_first_seen_at_across_updates(pool: PgPool) -> Result<(), sqlx::Error> {
    let users = UserRepository::new(pool.clone());
    let progress = ProgressRepository::new(pool.clone());

    users
        .ensure_user("learner", "chat")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let first_seen = Utc::now();
    progress
        .upsert(&Progress {
            user_id: "learner".into(),
            name_number: 5,
            phase: Phase::Learning,
            ease: 2.5,
            streak: 1,
            interval_days: 1,
            next_review_at: Some(first_seen),
            review_count: 1,
            correct_count: 1,
            first_seen_at: first_seen,
            last_reviewed_at: Some(first_seen),
        })
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let later = first_seen + chrono::Duration::days(1);
    progress
        .upsert(&Progress {
            user_id: "learner".into(),
            name_number: 5,
            phase: Phase::Learning,
            ease: 2.6,
            streak: 2,
            interval_days: 3,
            next_review_at: Some(later),
            review_count: 2,
            correct_count: 2,
            first_seen_at: later,
            last_reviewed_at: Some(later),
        })
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let row = progress
        .get("learner", 5)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?
        .expect("row should exist");
    assert_eq!(row.streak, 2);
    assert_eq!(row.first_seen_at, first_seen);

    Ok(())
}
