use std::sync::Arc;

use chrono::Utc;
use names_core::clock::TimeZoneSpec;
use names_core::ports::{PlanStore, SettingsStore};
use names_core::services::PlanEngine;
use names_storage::PgTransactor;

use crate::context::Context;

pub async fn ensure(ctx: &Context, user_id: &str) -> anyhow::Result<()> {
    let settings = ctx.settings_repo.get_or_create(user_id).await?;
    let tz = TimeZoneSpec::parse(&settings.timezone)?;

    let engine = PlanEngine::new(
        Arc::new(ctx.plan_repo.clone()),
        Arc::new(ctx.progress_repo.clone()),
        Arc::new(PgTransactor::new(ctx.pool.clone())),
    );
    let date_utc = engine
        .ensure_today_plan(user_id, &tz, settings.names_per_day, Utc::now())
        .await?;
    let names = ctx.plan_repo.names_for_date(user_id, date_utc).await?;
    println!(
        "{}",
        serde_json::json!({ "date_utc": date_utc, "names": names })
    );
    Ok(())
}

pub async fn show(ctx: &Context, user_id: &str) -> anyhow::Result<()> {
    let settings = ctx.settings_repo.get_or_create(user_id).await?;
    let tz = TimeZoneSpec::parse(&settings.timezone)?;
    let date_utc = tz.local_midnight_to_utc(Utc::now())?;
    let names = ctx.plan_repo.names_for_date(user_id, date_utc).await?;
    let items = ctx.catalog.by_numbers(&names);
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}
