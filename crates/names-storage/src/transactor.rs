//! [`Transactor`] adapter: the cross-store writes spec §5 requires to
//! run as a single transaction (reset-user, PlanEngine's fill).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use names_core::domain::{ReminderConfig, Settings};
use names_core::ports::Transactor;
use sqlx::PgPool;

use crate::StorageError;

#[derive(Clone)]
pub struct PgTransactor {
    pool: PgPool,
}

impl PgTransactor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Transactor for PgTransactor {
    async fn reset_user(&self, user_id: &str) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await.map_err(StorageError::Query)?;

        sqlx::query("DELETE FROM quiz_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Query)?;
        sqlx::query("DELETE FROM user_daily_name WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Query)?;
        sqlx::query("DELETE FROM user_progress WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Query)?;

        let settings = Settings::defaults(user_id);
        sqlx::query(
            r#"
            UPDATE user_settings SET
                names_per_day = $2,
                max_reviews_per_day = $3,
                quiz_mode = $4,
                learning_mode = $5,
                timezone = $6,
                updated_at = now()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(settings.names_per_day as i16)
        .bind(settings.max_reviews_per_day as i32)
        .bind(settings.quiz_mode.as_str())
        .bind(settings.learning_mode.as_str())
        .bind(&settings.timezone)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Query)?;

        let reminder = ReminderConfig::defaults(user_id);
        sqlx::query(
            r#"
            UPDATE user_reminders SET
                is_enabled = $2,
                interval_hours = $3,
                start_time = $4,
                end_time = $5,
                last_sent_at = NULL,
                next_send_at = NULL,
                last_kind = $6,
                updated_at = now()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(reminder.is_enabled)
        .bind(reminder.interval_hours as i16)
        .bind(&reminder.start_time)
        .bind(&reminder.end_time)
        .bind(reminder.last_kind.as_str())
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Query)?;

        tx.commit().await.map_err(StorageError::Query)?;
        Ok(())
    }

    async fn fill_plan(
        &self,
        user_id: &str,
        date_utc: DateTime<Utc>,
        name_numbers: &[u8],
    ) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await.map_err(StorageError::Query)?;

        for name_number in name_numbers {
            let next_slot: (i32,) = sqlx::query_as(
                "SELECT COALESCE(MAX(slot_index), -1) + 1 FROM user_daily_name WHERE user_id = $1 AND date_utc = $2",
            )
            .bind(user_id)
            .bind(date_utc)
            .fetch_one(&mut *tx)
            .await
            .map_err(StorageError::Query)?;

            sqlx::query(
                r#"
                INSERT INTO user_daily_name (user_id, date_utc, name_number, slot_index)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, date_utc, slot_index) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(date_utc)
            .bind(*name_number as i16)
            .bind(next_slot.0)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Query)?;
        }

        tx.commit().await.map_err(StorageError::Query)?;
        Ok(())
    }
}
