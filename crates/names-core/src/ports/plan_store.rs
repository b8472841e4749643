use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Per-user daily plan rows (spec §4.3). `date_utc` is always the
/// midnight-aligned instant produced by [`crate::clock::TimeZoneSpec`].
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn names_for_date(
        &self,
        user_id: &str,
        date_utc: DateTime<Utc>,
    ) -> anyhow::Result<Vec<u8>>;

    async fn names_count_for_date(
        &self,
        user_id: &str,
        date_utc: DateTime<Utc>,
    ) -> anyhow::Result<u32>;

    /// Computes the next slot index atomically and inserts with
    /// `ON CONFLICT (user, date, slot) DO NOTHING`. Idempotent per slot.
    async fn add_name_for_date(
        &self,
        user_id: &str,
        date_utc: DateTime<Utc>,
        name_number: u8,
    ) -> anyhow::Result<()>;

    /// Distinct items planned on past dates whose Progress is still
    /// `learning`, oldest-plan first.
    async fn carry_over_unfinished_from_past(
        &self,
        user_id: &str,
        today_date_utc: DateTime<Utc>,
        limit: u32,
    ) -> anyhow::Result<Vec<u8>>;

    /// Any past-planned item with `COALESCE(streak,0) < MIN_STREAK_FOR_MASTERY`.
    async fn has_unfinished_days(&self, user_id: &str) -> anyhow::Result<bool>;

    async fn oldest_unfinished_name(&self, user_id: &str) -> anyhow::Result<Option<u8>>;

    /// Deletes every plan entry for `user_id`. Used by `reset`.
    async fn delete_all(&self, user_id: &str) -> anyhow::Result<()>;
}
