use std::sync::Arc;

use chrono::Utc;
use names_core::services::{QuestionSelector, QuizEngine};

use crate::context::Context;

fn engine(ctx: &Context) -> QuizEngine {
    let selector = QuestionSelector::new(
        Arc::new(ctx.progress_repo.clone()),
        Arc::new(ctx.plan_repo.clone()),
    );
    QuizEngine::new(
        Arc::new(ctx.quiz_repo.clone()),
        Arc::new(ctx.settings_repo.clone()),
        ctx.catalog.clone(),
        selector,
    )
}

pub async fn start(ctx: &Context, user_id: &str, total: u32) -> anyhow::Result<()> {
    let session = engine(ctx).start_session(user_id, total, Utc::now()).await?;
    println!("{}", serde_json::to_string_pretty(&session)?);
    Ok(())
}

pub async fn current(ctx: &Context, session_id: &str, question_num: u32) -> anyhow::Result<()> {
    let (question, item) = engine(ctx).current(session_id, question_num).await?;
    let prompt = question.question_type.prompt(&item);
    println!("{}", serde_json::json!({ "question": question, "prompt": prompt }));
    Ok(())
}

pub async fn submit(
    ctx: &Context,
    session_id: &str,
    user_id: &str,
    option_index: &str,
) -> anyhow::Result<()> {
    let outcome = engine(ctx)
        .submit(session_id, user_id, option_index, Utc::now())
        .await?;
    println!("{}", serde_json::json!({
        "is_correct": outcome.is_correct,
        "correct_answer": outcome.correct_answer,
        "score": outcome.score,
        "total": outcome.total,
        "is_session_complete": outcome.is_session_complete,
    }));
    Ok(())
}
