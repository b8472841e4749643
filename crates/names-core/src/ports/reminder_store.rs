use crate::domain::{ReminderConfig, ReminderKind};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Per-user reminder configuration and the dispatch-loop queries that
/// drive [`crate::services::reminder_scheduler`] (spec §4.7).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn get_config(&self, user_id: &str) -> anyhow::Result<Option<ReminderConfig>>;

    /// Returns the existing row, or inserts and returns [`ReminderConfig::defaults`].
    async fn ensure_config(&self, user_id: &str) -> anyhow::Result<ReminderConfig>;

    /// One page of reminders due at or before `now`, ordered by
    /// `(next_send_at NULLS FIRST, user_id)`.
    async fn reminders_due(
        &self,
        now: DateTime<Utc>,
        batch_size: u32,
        offset: u32,
    ) -> anyhow::Result<Vec<ReminderConfig>>;

    /// Atomically sets `last_sent_at`, `next_send_at`, `last_kind`, `updated_at`.
    async fn record_send(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        next_send_at: DateTime<Utc>,
        last_kind: ReminderKind,
    ) -> anyhow::Result<()>;

    /// Used when no candidate name is available: pushes `next_send_at`
    /// forward without recording a send.
    async fn reschedule(
        &self,
        user_id: &str,
        next_send_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;

    async fn snooze(
        &self,
        user_id: &str,
        next_send_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;

    async fn set_enabled(&self, user_id: &str, enabled: bool) -> anyhow::Result<()>;

    async fn set_interval(
        &self,
        user_id: &str,
        interval_hours: u8,
    ) -> anyhow::Result<ReminderConfig>;

    async fn set_window(
        &self,
        user_id: &str,
        start_time: &str,
        end_time: &str,
    ) -> anyhow::Result<ReminderConfig>;

    /// Overwrites the row with [`ReminderConfig::defaults`], clearing
    /// `last_sent_at`/`next_send_at`. Used by `reset`.
    async fn reset_to_defaults(&self, user_id: &str) -> anyhow::Result<ReminderConfig>;
}
