use names_core::services::SettingsService;
use std::sync::Arc;

use crate::context::Context;

fn service(ctx: &Context) -> SettingsService {
    SettingsService::new(Arc::new(ctx.settings_repo.clone()))
}

pub async fn show(ctx: &Context, user_id: &str) -> anyhow::Result<()> {
    let settings = service(ctx).get_or_create(user_id).await?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

pub async fn update_names_per_day(ctx: &Context, user_id: &str, value: u8) -> anyhow::Result<()> {
    service(ctx).update_names_per_day(user_id, value).await?;
    println!("ok");
    Ok(())
}

pub async fn update_quiz_mode(ctx: &Context, user_id: &str, value: &str) -> anyhow::Result<()> {
    service(ctx).update_quiz_mode(user_id, value).await?;
    println!("ok");
    Ok(())
}

pub async fn update_learning_mode(ctx: &Context, user_id: &str, value: &str) -> anyhow::Result<()> {
    service(ctx).update_learning_mode(user_id, value).await?;
    println!("ok");
    Ok(())
}

pub async fn update_timezone(ctx: &Context, user_id: &str, value: &str) -> anyhow::Result<()> {
    service(ctx).update_timezone(user_id, value).await?;
    println!("ok");
    Ok(())
}
