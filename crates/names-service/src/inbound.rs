//! Inbound-update dispatch loop (spec §5 "Message loop"). The actual
//! chat/delivery adapter that produces [`InboundUpdate`]s is out of
//! scope; this only owns the concurrency shape a concrete adapter
//! plugs into: one consumer polling a stream, one short-lived task per
//! update so updates for different users run in parallel.

use tokio::sync::mpsc;

pub struct InboundUpdate {
    pub user_id: String,
    pub chat_id: String,
    pub text: String,
}

/// Drains `updates`, spawning one task per update via `handle`. Runs
/// until the sender side is dropped.
pub async fn run<F, Fut>(mut updates: mpsc::Receiver<InboundUpdate>, handle: F)
where
    F: Fn(InboundUpdate) -> Fut + Clone + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    while let Some(update) = updates.recv().await {
        let handle = handle.clone();
        tokio::spawn(async move { handle(update).await });
    }
}
