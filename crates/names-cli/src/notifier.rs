//! Stdout stand-in for the out-of-scope delivery channel, used only by
//! the `reminder tick` debug command.

use names_core::ports::{Notifier, ReminderPayload};

pub struct StdoutNotifier;

#[async_trait::async_trait]
impl Notifier for StdoutNotifier {
    async fn send_reminder(
        &self,
        user_id: &str,
        _chat_id: &str,
        payload: ReminderPayload,
    ) -> anyhow::Result<()> {
        println!(
            "reminder: user={user_id} kind={} name={}",
            payload.kind.as_str(),
            payload.item.number
        );
        Ok(())
    }
}
