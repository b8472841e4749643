//! [`SettingsStore`] adapter.

use async_trait::async_trait;
use names_core::domain::{LearningMode, QuizMode, Settings};
use names_core::ports::SettingsStore;
use sqlx::{FromRow, PgPool, Row};

use crate::StorageError;

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

struct SettingsRow(Settings);

impl FromRow<'_, sqlx::postgres::PgRow> for SettingsRow {
    fn from_row(row: &sqlx::postgres::PgRow) -> sqlx::Result<Self> {
        let quiz_mode_raw: String = row.try_get("quiz_mode")?;
        let learning_mode_raw: String = row.try_get("learning_mode")?;
        Ok(SettingsRow(Settings {
            user_id: row.try_get("user_id")?,
            names_per_day: row.try_get::<i16, _>("names_per_day")? as u8,
            quiz_mode: QuizMode::parse(&quiz_mode_raw).unwrap_or_default(),
            learning_mode: LearningMode::parse(&learning_mode_raw).unwrap_or_default(),
            timezone: row.try_get("timezone")?,
            max_reviews_per_day: row.try_get::<i32, _>("max_reviews_per_day")? as u32,
        }))
    }
}

const SELECT_COLUMNS: &str =
    "user_id, names_per_day, max_reviews_per_day, quiz_mode, learning_mode, timezone";

#[async_trait]
impl SettingsStore for SettingsRepository {
    async fn get_or_create(&self, user_id: &str) -> anyhow::Result<Settings> {
        let row = sqlx::query_as::<_, SettingsRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM user_settings WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Query)?;

        if let Some(SettingsRow(settings)) = row {
            return Ok(settings);
        }

        let defaults = Settings::defaults(user_id);
        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, names_per_day, max_reviews_per_day, quiz_mode, learning_mode, timezone)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(defaults.names_per_day as i16)
        .bind(defaults.max_reviews_per_day as i32)
        .bind(defaults.quiz_mode.as_str())
        .bind(defaults.learning_mode.as_str())
        .bind(&defaults.timezone)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Query)?;

        Ok(defaults)
    }

    async fn update_names_per_day(&self, user_id: &str, value: u8) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE user_settings SET names_per_day = $2, updated_at = now() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(value as i16)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(())
    }

    async fn update_quiz_mode(&self, user_id: &str, value: QuizMode) -> anyhow::Result<()> {
        sqlx::query("UPDATE user_settings SET quiz_mode = $2, updated_at = now() WHERE user_id = $1")
            .bind(user_id)
            .bind(value.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::Query)?;
        Ok(())
    }

    async fn update_learning_mode(&self, user_id: &str, value: LearningMode) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE user_settings SET learning_mode = $2, updated_at = now() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(value.as_str())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(())
    }

    async fn update_timezone(&self, user_id: &str, value: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE user_settings SET timezone = $2, updated_at = now() WHERE user_id = $1")
            .bind(user_id)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Query)?;
        Ok(())
    }

    async fn update_max_reviews_per_day(&self, user_id: &str, value: u32) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE user_settings SET max_reviews_per_day = $2, updated_at = now() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(value as i32)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(())
    }

    async fn reset_to_defaults(&self, user_id: &str) -> anyhow::Result<Settings> {
        let defaults = Settings::defaults(user_id);
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
        .bind(defaults.names_per_day as i16)
        .bind(defaults.max_reviews_per_day as i32)
        .bind(defaults.quiz_mode.as_str())
        .bind(defaults.learning_mode.as_str())
        .bind(&defaults.timezone)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(defaults)
    }
}
