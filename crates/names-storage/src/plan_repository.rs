//! [`PlanStore`] adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use names_core::ports::PlanStore;
use names_core::srs::MIN_STREAK_FOR_MASTERY;
use sqlx::PgPool;

use crate::StorageError;

#[derive(Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanStore for PlanRepository {
    async fn names_for_date(
        &self,
        user_id: &str,
        date_utc: DateTime<Utc>,
    ) -> anyhow::Result<Vec<u8>> {
        let rows: Vec<(i16,)> = sqlx::query_as(
            r#"
            SELECT name_number FROM user_daily_name
            WHERE user_id = $1 AND date_utc = $2
            ORDER BY slot_index ASC
            "#,
        )
        .bind(user_id)
        .bind(date_utc)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(rows.into_iter().map(|(n,)| n as u8).collect())
    }

    async fn names_count_for_date(
        &self,
        user_id: &str,
        date_utc: DateTime<Utc>,
    ) -> anyhow::Result<u32> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM user_daily_name WHERE user_id = $1 AND date_utc = $2",
        )
        .bind(user_id)
        .bind(date_utc)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(row.0 as u32)
    }

    async fn add_name_for_date(
        &self,
        user_id: &str,
        date_utc: DateTime<Utc>,
        name_number: u8,
    ) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await.map_err(StorageError::Query)?;

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
        .bind(name_number as i16)
        .bind(next_slot.0)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Query)?;

        tx.commit().await.map_err(StorageError::Query)?;
        Ok(())
    }

    async fn carry_over_unfinished_from_past(
        &self,
        user_id: &str,
        today_date_utc: DateTime<Utc>,
        limit: u32,
    ) -> anyhow::Result<Vec<u8>> {
        let rows: Vec<(i16,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT ON (d.name_number) d.name_number
            FROM user_daily_name d
            JOIN user_progress p ON p.user_id = d.user_id AND p.name_number = d.name_number
            WHERE d.user_id = $1 AND d.date_utc < $2 AND p.phase = 'learning'
            ORDER BY d.name_number, d.date_utc ASC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(today_date_utc)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(rows.into_iter().map(|(n,)| n as u8).collect())
    }

    async fn has_unfinished_days(&self, user_id: &str) -> anyhow::Result<bool> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM user_daily_name d
            LEFT JOIN user_progress p ON p.user_id = d.user_id AND p.name_number = d.name_number
            WHERE d.user_id = $1 AND COALESCE(p.streak, 0) < $2
            "#,
        )
        .bind(user_id)
        .bind(MIN_STREAK_FOR_MASTERY as i32)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(row.0 > 0)
    }

    async fn oldest_unfinished_name(&self, user_id: &str) -> anyhow::Result<Option<u8>> {
        let row: Option<(i16,)> = sqlx::query_as(
            r#"
            SELECT d.name_number FROM user_daily_name d
            LEFT JOIN user_progress p ON p.user_id = d.user_id AND p.name_number = d.name_number
            WHERE d.user_id = $1 AND COALESCE(p.streak, 0) < $2
            ORDER BY d.date_utc ASC, d.slot_index ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(MIN_STREAK_FOR_MASTERY as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(row.map(|(n,)| n as u8))
    }

    async fn delete_all(&self, user_id: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM user_daily_name WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Query)?;
        Ok(())
    }
}
