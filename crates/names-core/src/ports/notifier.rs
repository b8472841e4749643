use crate::domain::{Item, ProgressStats, ReminderKind};
use async_trait::async_trait;

/// The reminder payload handed to whatever outbound channel (a chat
/// bot adapter, email, push) implements [`Notifier`]. Out of scope for
/// this crate — only the interface is owned here.
#[derive(Debug, Clone)]
pub struct ReminderPayload {
    pub kind: ReminderKind,
    pub item: Item,
    pub stats: ProgressStats,
}

/// External delivery boundary for reminder dispatch (spec §4.7).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_reminder(
        &self,
        user_id: &str,
        chat_id: &str,
        payload: ReminderPayload,
    ) -> anyhow::Result<()>;
}
