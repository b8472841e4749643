#![cfg(feature = "postgres-tests")]

use chrono::{TimeZone, Utc};
use sqlx::PgPool;

use names_core::ports::{PlanStore, UserRegistry};
use names_storage::{PlanRepository, UserRepository};

#[sqlx::test(migrations = "./migrations")]
async fn add_name_for_date_assigns_increasing_slots(pool: PgPool) -> Result<(), sqlx::Error> {
    let users = UserRepository::new(pool.clone());
    let plan = PlanRepository::new(pool.clone());

    users
        .ensure_user("learner", "chat")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let today = Utc.with_ymd_and_hms(2026, 7, 31, 0, 0, 0).unwrap();

    plan.add_name_for_date("learner", today, 1)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    plan.add_name_for_date("learner", today, 2)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let names = plan
        .names_for_date("learner", today)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    assert_eq!(names, vec![1, 2]);

    let count = plan
        .names_count_for_date("learner", today)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    assert_eq!(count, 2);

    Ok(())
}
