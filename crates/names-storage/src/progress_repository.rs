//! [`ProgressStore`] adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use names_core::domain::{Phase, Progress, ProgressStats, CATALOG_SIZE};
use names_core::ports::ProgressStore;
use sqlx::{FromRow, PgPool, Row};
use std::collections::HashMap;

use crate::StorageError;

#[derive(Clone)]
pub struct ProgressRepository {
    pool: PgPool,
}

impl ProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

struct ProgressRow(Progress);

impl FromRow<'_, sqlx::postgres::PgRow> for ProgressRow {
    fn from_row(row: &sqlx::postgres::PgRow) -> sqlx::Result<Self> {
        let phase_raw: String = row.try_get("phase")?;
        Ok(ProgressRow(Progress {
            user_id: row.try_get("user_id")?,
            name_number: row.try_get::<i16, _>("name_number")? as u8,
            phase: Phase::parse(&phase_raw).unwrap_or(Phase::New),
            ease: row.try_get("ease")?,
            streak: row.try_get::<i32, _>("streak")? as u32,
            interval_days: row.try_get::<i32, _>("interval_days")? as u32,
            next_review_at: row.try_get("next_review_at")?,
            review_count: row.try_get::<i32, _>("review_count")? as u32,
            correct_count: row.try_get::<i32, _>("correct_count")? as u32,
            first_seen_at: row.try_get("first_seen_at")?,
            last_reviewed_at: row.try_get("last_reviewed_at")?,
        }))
    }
}

const SELECT_COLUMNS: &str = "user_id, name_number, phase, ease, streak, interval_days, \
     next_review_at, review_count, correct_count, first_seen_at, last_reviewed_at";

#[async_trait]
impl ProgressStore for ProgressRepository {
    async fn get(&self, user_id: &str, name_number: u8) -> anyhow::Result<Option<Progress>> {
        let row = sqlx::query_as::<_, ProgressRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM user_progress WHERE user_id = $1 AND name_number = $2"
        ))
        .bind(user_id)
        .bind(name_number as i16)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(row.map(|r| r.0))
    }

    async fn get_by_numbers(
        &self,
        user_id: &str,
        numbers: &[u8],
    ) -> anyhow::Result<HashMap<u8, Progress>> {
        let numbers_i16: Vec<i16> = numbers.iter().map(|n| *n as i16).collect();
        let rows = sqlx::query_as::<_, ProgressRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM user_progress WHERE user_id = $1 AND name_number = ANY($2)"
        ))
        .bind(user_id)
        .bind(&numbers_i16)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Query)?;

        Ok(rows.into_iter().map(|r| (r.0.name_number, r.0)).collect())
    }

    async fn get_streak(&self, user_id: &str, name_number: u8) -> anyhow::Result<u32> {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT streak FROM user_progress WHERE user_id = $1 AND name_number = $2",
        )
        .bind(user_id)
        .bind(name_number as i16)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(row.map(|(s,)| s as u32).unwrap_or(0))
    }

    async fn names_due_for_review(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        limit: u32,
    ) -> anyhow::Result<Vec<u8>> {
        let rows: Vec<(i16,)> = sqlx::query_as(
            r#"
            SELECT name_number FROM user_progress
            WHERE user_id = $1 AND next_review_at IS NOT NULL AND next_review_at <= $2
            ORDER BY next_review_at ASC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(now)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(rows.into_iter().map(|(n,)| n as u8).collect())
    }

    async fn learning_names(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        limit: u32,
    ) -> anyhow::Result<Vec<u8>> {
        let rows: Vec<(i16,)> = sqlx::query_as(
            r#"
            SELECT name_number FROM user_progress
            WHERE user_id = $1 AND phase = 'learning'
              AND (next_review_at IS NULL OR next_review_at <= $2)
            ORDER BY COALESCE(next_review_at, last_reviewed_at) ASC NULLS FIRST
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(now)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(rows.into_iter().map(|(n,)| n as u8).collect())
    }

    async fn names_for_introduction(&self, user_id: &str, limit: u32) -> anyhow::Result<Vec<u8>> {
        let rows: Vec<(i16,)> = sqlx::query_as(
            r#"
            SELECT gs.n FROM generate_series(1, $3::int) AS gs(n)
            WHERE NOT EXISTS (
                SELECT 1 FROM user_progress p
                WHERE p.user_id = $1 AND p.name_number = gs.n
            )
            ORDER BY gs.n ASC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .bind(CATALOG_SIZE as i32)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(rows.into_iter().map(|(n,)| n as u8).collect())
    }

    async fn new_names(&self, user_id: &str, limit: u32) -> anyhow::Result<Vec<u8>> {
        let rows: Vec<(i16,)> = sqlx::query_as(
            r#"
            SELECT gs.n FROM generate_series(1, $3::int) AS gs(n)
            LEFT JOIN user_progress p ON p.user_id = $1 AND p.name_number = gs.n
            WHERE p.name_number IS NULL OR (p.phase = 'new' AND p.review_count < 2)
            ORDER BY gs.n ASC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .bind(CATALOG_SIZE as i32)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(rows.into_iter().map(|(n,)| n as u8).collect())
    }

    async fn random_reinforcement(&self, user_id: &str, limit: u32) -> anyhow::Result<Vec<u8>> {
        let rows: Vec<(i16,)> = sqlx::query_as(
            r#"
            SELECT name_number FROM user_progress
            WHERE user_id = $1 AND phase IN ('learning', 'mastered') AND review_count > 0
            ORDER BY random()
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(rows.into_iter().map(|(n,)| n as u8).collect())
    }

    async fn next_due_name(&self, user_id: &str, now: DateTime<Utc>) -> anyhow::Result<Option<u8>> {
        let names = self.names_due_for_review(user_id, now, 1).await?;
        Ok(names.into_iter().next())
    }

    async fn stats(&self, user_id: &str, now: DateTime<Utc>) -> anyhow::Result<ProgressStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_viewed,
                COUNT(*) FILTER (WHERE phase = 'new') AS new_count,
                COUNT(*) FILTER (WHERE phase = 'learning') AS learning_count,
                COUNT(*) FILTER (WHERE phase = 'mastered') AS mastered_count,
                COUNT(*) FILTER (WHERE next_review_at IS NOT NULL AND next_review_at <= $2) AS due_today,
                COALESCE(SUM(review_count), 0) AS total_reviews,
                COALESCE(SUM(correct_count), 0) AS total_correct,
                MAX(last_reviewed_at) AS last_activity,
                COALESCE(AVG(ease), 0.0) AS average_ease
            FROM user_progress WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Query)?;

        let total_reviews: i64 = row.try_get("total_reviews")?;
        let total_correct: i64 = row.try_get("total_correct")?;
        let accuracy = if total_reviews > 0 {
            (total_correct as f64 / total_reviews as f64 * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        Ok(ProgressStats {
            total_viewed: row.try_get::<i64, _>("total_viewed")? as u32,
            new_count: row.try_get::<i64, _>("new_count")? as u32,
            learning_count: row.try_get::<i64, _>("learning_count")? as u32,
            mastered_count: row.try_get::<i64, _>("mastered_count")? as u32,
            due_today: row.try_get::<i64, _>("due_today")? as u32,
            accuracy,
            last_activity: row.try_get("last_activity")?,
            average_ease: row.try_get("average_ease")?,
        })
    }

    async fn upsert(&self, progress: &Progress) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_progress (
                user_id, name_number, phase, ease, streak, interval_days,
                next_review_at, review_count, correct_count, first_seen_at, last_reviewed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id, name_number) DO UPDATE SET
                phase = EXCLUDED.phase,
                ease = EXCLUDED.ease,
                streak = EXCLUDED.streak,
                interval_days = EXCLUDED.interval_days,
                next_review_at = EXCLUDED.next_review_at,
                review_count = EXCLUDED.review_count,
                correct_count = EXCLUDED.correct_count,
                last_reviewed_at = EXCLUDED.last_reviewed_at
            "#,
        )
        .bind(&progress.user_id)
        .bind(progress.name_number as i16)
        .bind(progress.phase.as_str())
        .bind(progress.ease)
        .bind(progress.streak as i32)
        .bind(progress.interval_days as i32)
        .bind(progress.next_review_at)
        .bind(progress.review_count as i32)
        .bind(progress.correct_count as i32)
        .bind(progress.first_seen_at)
        .bind(progress.last_reviewed_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(())
    }

    async fn mark_introduced(
        &self,
        user_id: &str,
        name_number: u8,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let progress = Progress::introduced(user_id, name_number, now);
        sqlx::query(
            r#"
            INSERT INTO user_progress (
                user_id, name_number, phase, ease, streak, interval_days,
                next_review_at, review_count, correct_count, first_seen_at, introduced_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            ON CONFLICT (user_id, name_number) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(name_number as i16)
        .bind(progress.phase.as_str())
        .bind(progress.ease)
        .bind(progress.streak as i32)
        .bind(progress.interval_days as i32)
        .bind(progress.next_review_at)
        .bind(progress.review_count as i32)
        .bind(progress.correct_count as i32)
        .bind(progress.first_seen_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(())
    }

    async fn delete_all(&self, user_id: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM user_progress WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Query)?;
        Ok(())
    }
}
