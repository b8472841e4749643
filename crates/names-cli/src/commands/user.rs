use names_core::ports::UserRegistry;

use crate::context::Context;

pub async fn ensure(ctx: &Context, user_id: &str, chat_id: &str) -> anyhow::Result<()> {
    let created = ctx.user_repo.ensure_user(user_id, chat_id).await?;
    println!(
        "{}",
        serde_json::json!({ "user_id": user_id, "created": created })
    );
    Ok(())
}
