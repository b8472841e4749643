use std::sync::Arc;

use names_core::services::ResetService;
use names_storage::PgTransactor;

use crate::context::Context;

pub async fn run(ctx: &Context, user_id: &str) -> anyhow::Result<()> {
    let service = ResetService::new(Arc::new(PgTransactor::new(ctx.pool.clone())));
    service.reset(user_id).await?;
    println!("ok");
    Ok(())
}
