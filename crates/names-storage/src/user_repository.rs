//! [`UserRegistry`] adapter.

use async_trait::async_trait;
use names_core::ports::UserRegistry;
use sqlx::PgPool;

use crate::StorageError;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRegistry for UserRepository {
    async fn ensure_user(&self, user_id: &str, chat_id: &str) -> anyhow::Result<bool> {
        let mut tx = self.pool.begin().await.map_err(StorageError::Query)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (id, chat_id)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(chat_id)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Query)?;

        let is_new = inserted.rows_affected() > 0;

        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Query)?;

        tx.commit().await.map_err(StorageError::Query)?;

        Ok(is_new)
    }
}
