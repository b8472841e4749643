use std::sync::Arc;

use chrono::Utc;
use names_core::services::ReminderScheduler;
use names_storage::PgTransactor;

use crate::context::Context;
use crate::notifier::StdoutNotifier;

fn scheduler(ctx: &Context) -> ReminderScheduler {
    ReminderScheduler::new(
        Arc::new(ctx.reminder_repo.clone()),
        Arc::new(ctx.progress_repo.clone()),
        Arc::new(ctx.plan_repo.clone()),
        Arc::new(ctx.settings_repo.clone()),
        ctx.catalog.clone(),
        Arc::new(StdoutNotifier),
        Arc::new(PgTransactor::new(ctx.pool.clone())),
    )
}

pub async fn tick(ctx: &Context) -> anyhow::Result<()> {
    let dispatched = scheduler(ctx).process_hour(Utc::now()).await?;
    println!("{}", serde_json::json!({ "dispatched": dispatched }));
    Ok(())
}

pub async fn snooze(ctx: &Context, user_id: &str) -> anyhow::Result<()> {
    scheduler(ctx).snooze(user_id, Utc::now()).await?;
    println!("ok");
    Ok(())
}

pub async fn disable(ctx: &Context, user_id: &str) -> anyhow::Result<()> {
    scheduler(ctx).disable(user_id).await?;
    println!("ok");
    Ok(())
}
