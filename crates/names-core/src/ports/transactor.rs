use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Groups the writes spec §5 requires to run as a single transaction
/// but that span more than one store (reset-user, PlanEngine's
/// debt/introduction fill). Everything that stays within one store
/// (ensure-user, create-session, submit-answer) is already atomic at
/// the adapter level and doesn't need this port.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Transactor: Send + Sync {
    /// Deletes sessions, plan entries, and progress, then resets
    /// settings and reminder config to defaults — all in one
    /// transaction.
    async fn reset_user(&self, user_id: &str) -> anyhow::Result<()>;

    /// Inserts `name_numbers` as plan entries for `user_id` on
    /// `date_utc`, assigning increasing slot indices, all in one
    /// transaction.
    async fn fill_plan(
        &self,
        user_id: &str,
        date_utc: DateTime<Utc>,
        name_numbers: &[u8],
    ) -> anyhow::Result<()>;
}
