use async_trait::async_trait;

/// Identity upserts (spec §4.8).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Upserts the user and, in the same transaction, ensures default
    /// Settings exist. Returns `true` if the user row was newly created.
    async fn ensure_user(&self, user_id: &str, chat_id: &str) -> anyhow::Result<bool>;
}
