//! [`ReminderStore`] adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use names_core::domain::{ReminderConfig, ReminderKind};
use names_core::ports::ReminderStore;
use sqlx::{FromRow, PgPool, Row};

use crate::StorageError;

#[derive(Clone)]
pub struct ReminderRepository {
    pool: PgPool,
}

impl ReminderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

struct ReminderRow(ReminderConfig);

impl FromRow<'_, sqlx::postgres::PgRow> for ReminderRow {
    fn from_row(row: &sqlx::postgres::PgRow) -> sqlx::Result<Self> {
        let last_kind_raw: String = row.try_get("last_kind")?;
        Ok(ReminderRow(ReminderConfig {
            user_id: row.try_get("user_id")?,
            is_enabled: row.try_get("is_enabled")?,
            interval_hours: row.try_get::<i16, _>("interval_hours")? as u8,
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            last_sent_at: row.try_get("last_sent_at")?,
            next_send_at: row.try_get("next_send_at")?,
            last_kind: ReminderKind::parse(&last_kind_raw).unwrap_or(ReminderKind::New),
        }))
    }
}

const SELECT_COLUMNS: &str =
    "user_id, is_enabled, interval_hours, start_time, end_time, last_sent_at, next_send_at, last_kind";

#[async_trait]
impl ReminderStore for ReminderRepository {
    async fn get_config(&self, user_id: &str) -> anyhow::Result<Option<ReminderConfig>> {
        let row = sqlx::query_as::<_, ReminderRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM user_reminders WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(row.map(|r| r.0))
    }

    async fn ensure_config(&self, user_id: &str) -> anyhow::Result<ReminderConfig> {
        if let Some(existing) = self.get_config(user_id).await? {
            return Ok(existing);
        }

        let defaults = ReminderConfig::defaults(user_id);
        sqlx::query(
            r#"
            INSERT INTO user_reminders (user_id, is_enabled, interval_hours, start_time, end_time, last_kind)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(defaults.is_enabled)
        .bind(defaults.interval_hours as i16)
        .bind(&defaults.start_time)
        .bind(&defaults.end_time)
        .bind(defaults.last_kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(defaults)
    }

    async fn reminders_due(
        &self,
        now: DateTime<Utc>,
        batch_size: u32,
        offset: u32,
    ) -> anyhow::Result<Vec<ReminderConfig>> {
        let rows = sqlx::query_as::<_, ReminderRow>(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM user_reminders
            WHERE is_enabled = TRUE AND (next_send_at IS NULL OR next_send_at <= $1)
            ORDER BY next_send_at ASC NULLS FIRST, user_id ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(now)
        .bind(batch_size as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    async fn record_send(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        next_send_at: DateTime<Utc>,
        last_kind: ReminderKind,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE user_reminders SET
                last_sent_at = $2, next_send_at = $3, last_kind = $4, updated_at = now()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(now)
        .bind(next_send_at)
        .bind(last_kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(())
    }

    async fn reschedule(&self, user_id: &str, next_send_at: DateTime<Utc>) -> anyhow::Result<()> {
        sqlx::query("UPDATE user_reminders SET next_send_at = $2, updated_at = now() WHERE user_id = $1")
            .bind(user_id)
            .bind(next_send_at)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Query)?;
        Ok(())
    }

    async fn snooze(&self, user_id: &str, next_send_at: DateTime<Utc>) -> anyhow::Result<()> {
        self.reschedule(user_id, next_send_at).await
    }

    async fn set_enabled(&self, user_id: &str, enabled: bool) -> anyhow::Result<()> {
        sqlx::query("UPDATE user_reminders SET is_enabled = $2, updated_at = now() WHERE user_id = $1")
            .bind(user_id)
            .bind(enabled)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Query)?;
        Ok(())
    }

    async fn set_interval(&self, user_id: &str, interval_hours: u8) -> anyhow::Result<ReminderConfig> {
        let row = sqlx::query_as::<_, ReminderRow>(&format!(
            r#"
            UPDATE user_reminders SET interval_hours = $2, updated_at = now()
            WHERE user_id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(interval_hours as i16)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(row.0)
    }

    async fn set_window(
        &self,
        user_id: &str,
        start_time: &str,
        end_time: &str,
    ) -> anyhow::Result<ReminderConfig> {
        let row = sqlx::query_as::<_, ReminderRow>(&format!(
            r#"
            UPDATE user_reminders SET start_time = $2, end_time = $3, updated_at = now()
            WHERE user_id = $1
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(row.0)
    }

    async fn reset_to_defaults(&self, user_id: &str) -> anyhow::Result<ReminderConfig> {
        let defaults = ReminderConfig::defaults(user_id);
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
        .bind(defaults.is_enabled)
        .bind(defaults.interval_hours as i16)
        .bind(&defaults.start_time)
        .bind(&defaults.end_time)
        .bind(defaults.last_kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(defaults)
    }
}
