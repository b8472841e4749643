//! Placeholder [`Notifier`]. The real delivery channel (a chat bot, push,
//! email) is out of scope here; this just logs so the reminder cron has
//! something to drive against until an adapter is wired in.

use async_trait::async_trait;
use names_core::ports::{Notifier, ReminderPayload};

pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send_reminder(
        &self,
        user_id: &str,
        chat_id: &str,
        payload: ReminderPayload,
    ) -> anyhow::Result<()> {
        tracing::info!(
            user_id,
            chat_id,
            kind = payload.kind.as_str(),
            name_number = payload.item.number,
            "reminder dispatched"
        );
        Ok(())
    }
}
