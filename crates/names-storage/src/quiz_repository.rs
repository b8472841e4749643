//! [`QuizStore`] adapter. `submit_answer` is the one operation that
//! ties a session update to a Progress update inside a single
//! transaction guarded by the session's `version` column (spec §4.5).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use names_core::domain::{
    AnswerQuality, Progress, QuestionType, QuizMode, QuizQuestion, QuizSession, SessionStatus,
};
use names_core::ports::{NewQuizQuestion, QuizStore, SubmitAnswerOutcome};
use sqlx::{PgPool, Row};

use crate::StorageError;

#[derive(Clone)]
pub struct QuizRepository {
    pool: PgPool,
}

impl QuizRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizStore for QuizRepository {
    async fn abandon_active_sessions(&self, user_id: &str) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE quiz_sessions SET session_status = 'abandoned' WHERE user_id = $1 AND session_status = 'active'",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Query)?;
        Ok(())
    }

    async fn create_session_with_questions(
        &self,
        session: &QuizSession,
        questions: &[NewQuizQuestion],
    ) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await.map_err(StorageError::Query)?;

        sqlx::query(
            r#"
            INSERT INTO quiz_sessions (
                id, user_id, current_question_num, correct_answers, total_questions,
                quiz_mode, session_status, started_at, completed_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(session.current_question_num as i32)
        .bind(session.correct_answers as i32)
        .bind(session.total_questions as i32)
        .bind(session.quiz_mode.as_str())
        .bind(session.session_status.as_str())
        .bind(session.started_at)
        .bind(session.completed_at)
        .bind(session.version)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Query)?;

        for question in questions {
            let question_id = uuid::Uuid::new_v4().to_string();
            sqlx::query(
                r#"
                INSERT INTO quiz_questions (
                    id, session_id, question_order, name_number, question_type,
                    correct_answer, options, correct_index
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(question_id)
            .bind(&session.id)
            .bind(question.question_order as i32)
            .bind(question.name_number as i16)
            .bind(question.question_type.as_str())
            .bind(&question.correct_answer)
            .bind(&question.options)
            .bind(question.correct_index as i16)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Query)?;
        }

        tx.commit().await.map_err(StorageError::Query)?;
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> anyhow::Result<Option<QuizSession>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, current_question_num, correct_answers, total_questions,
                   quiz_mode, session_status, started_at, completed_at, version
            FROM quiz_sessions WHERE id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Query)?;

        row.map(session_from_row).transpose()
    }

    async fn get_question(
        &self,
        session_id: &str,
        question_order: u32,
    ) -> anyhow::Result<Option<QuizQuestion>> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, question_order, name_number, question_type,
                   options, correct_index, correct_answer, created_at
            FROM quiz_questions WHERE session_id = $1 AND question_order = $2
            "#,
        )
        .bind(session_id)
        .bind(question_order as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Query)?;

        row.map(question_from_row).transpose()
    }

    async fn submit_answer(
        &self,
        session_id: &str,
        user_id: &str,
        raw_option_index: i64,
        now: DateTime<Utc>,
    ) -> anyhow::Result<SubmitAnswerOutcome> {
        let mut tx = self.pool.begin().await.map_err(StorageError::Query)?;

        let session_row = sqlx::query(
            r#"
            SELECT current_question_num, correct_answers, total_questions, session_status, version
            FROM quiz_sessions WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(session_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(StorageError::Query)?;

        let Some(session_row) = session_row else {
            return Ok(SubmitAnswerOutcome::SessionNotFound);
        };

        let status: String = session_row.try_get("session_status").map_err(StorageError::Query)?;
        if status != SessionStatus::Active.as_str() {
            return Ok(SubmitAnswerOutcome::SessionNotActive);
        }

        let current_question_num: i32 = session_row
            .try_get("current_question_num")
            .map_err(StorageError::Query)?;
        let correct_answers: i32 = session_row.try_get("correct_answers").map_err(StorageError::Query)?;
        let total_questions: i32 = session_row.try_get("total_questions").map_err(StorageError::Query)?;
        let version: i64 = session_row.try_get("version").map_err(StorageError::Query)?;

        let question_row = sqlx::query(
            "SELECT id, name_number, correct_answer, correct_index, question_type, options FROM quiz_questions WHERE session_id = $1 AND question_order = $2",
        )
        .bind(session_id)
        .bind(current_question_num)
        .fetch_optional(&mut *tx)
        .await
        .map_err(StorageError::Query)?;

        let Some(question_row) = question_row else {
            anyhow::bail!("session {session_id} has no question at order {current_question_num}");
        };

        let question_id: String = question_row.try_get("id").map_err(StorageError::Query)?;
        let name_number: i16 = question_row.try_get("name_number").map_err(StorageError::Query)?;
        let correct_answer: String = question_row.try_get("correct_answer").map_err(StorageError::Query)?;
        let correct_index: i16 = question_row.try_get("correct_index").map_err(StorageError::Query)?;
        let question_type_raw: String = question_row.try_get("question_type").map_err(StorageError::Query)?;
        let question_type = QuestionType::parse(&question_type_raw).unwrap_or(QuestionType::Translation);
        let options: Vec<String> = question_row.try_get("options").map_err(StorageError::Query)?;

        let is_correct = raw_option_index == correct_index as i64;
        let user_answer = usize::try_from(raw_option_index)
            .ok()
            .and_then(|i| options.get(i))
            .cloned()
            .unwrap_or_else(|| "invalid".to_string());

        let progress_row = sqlx::query(
            r#"
            SELECT user_id, name_number, phase, ease, streak, interval_days, next_review_at,
                   review_count, correct_count, first_seen_at, last_reviewed_at
            FROM user_progress WHERE user_id = $1 AND name_number = $2 FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(name_number)
        .fetch_optional(&mut *tx)
        .await
        .map_err(StorageError::Query)?;

        let progress = match progress_row {
            Some(row) => progress_from_row(&row).map_err(StorageError::Query)?,
            None => Progress::new(user_id, name_number as u8, now),
        };

        let quality = if is_correct { AnswerQuality::Good } else { AnswerQuality::Fail };
        let updated = names_core::srs::update(progress, quality, now);

        sqlx::query(
            r#"
            INSERT INTO user_progress (
                user_id, name_number, phase, ease, streak, interval_days,
                next_review_at, review_count, correct_count, first_seen_at, last_reviewed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id, name_number) DO UPDATE SET
                phase = EXCLUDED.phase,
                ease = EXCLUDED.ease,
                streak = EXCLUDED.streak,
                interval_days = EXCLUDED.interval_days,
                next_review_at = EXCLUDED.next_review_at,
                review_count = EXCLUDED.review_count,
                correct_count = EXCLUDED.correct_count,
                last_reviewed_at = EXCLUDED.last_reviewed_at
            "#,
        )
        .bind(&updated.user_id)
        .bind(updated.name_number as i16)
        .bind(updated.phase.as_str())
        .bind(updated.ease)
        .bind(updated.streak as i32)
        .bind(updated.interval_days as i32)
        .bind(updated.next_review_at)
        .bind(updated.review_count as i32)
        .bind(updated.correct_count as i32)
        .bind(updated.first_seen_at)
        .bind(updated.last_reviewed_at)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Query)?;

        let answer_id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO quiz_answers (
                id, user_id, session_id, question_id, name_number,
                user_answer, correct_answer, question_type, is_correct, answered_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(answer_id)
        .bind(user_id)
        .bind(session_id)
        .bind(question_id)
        .bind(name_number)
        .bind(user_answer)
        .bind(&correct_answer)
        .bind(question_type.as_str())
        .bind(is_correct)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Query)?;

        let new_correct_answers = correct_answers + is_correct as i32;
        let new_question_num = current_question_num + 1;
        let is_session_complete = new_question_num > total_questions;
        let new_status = if is_session_complete {
            SessionStatus::Completed
        } else {
            SessionStatus::Active
        };
        let completed_at = is_session_complete.then_some(now);

        let update_result = sqlx::query(
            r#"
            UPDATE quiz_sessions SET
                current_question_num = $2,
                correct_answers = $3,
                session_status = $4,
                completed_at = $5,
                version = version + 1
            WHERE id = $1 AND version = $6
            "#,
        )
        .bind(session_id)
        .bind(new_question_num)
        .bind(new_correct_answers)
        .bind(new_status.as_str())
        .bind(completed_at)
        .bind(version)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Query)?;

        if update_result.rows_affected() == 0 {
            tx.rollback().await.map_err(StorageError::Query)?;
            return Ok(SubmitAnswerOutcome::OptimisticLockFailed);
        }

        tx.commit().await.map_err(StorageError::Query)?;

        Ok(SubmitAnswerOutcome::Accepted {
            is_correct,
            correct_answer,
            name_number: name_number as u8,
            is_session_complete,
            score: new_correct_answers as u32,
            total: total_questions as u32,
        })
    }

    async fn delete_all(&self, user_id: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM quiz_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Query)?;
        Ok(())
    }
}

fn session_from_row(row: sqlx::postgres::PgRow) -> anyhow::Result<QuizSession> {
    let quiz_mode_raw: String = row.try_get("quiz_mode").map_err(StorageError::Query)?;
    let status_raw: String = row.try_get("session_status").map_err(StorageError::Query)?;
    Ok(QuizSession {
        id: row.try_get("id").map_err(StorageError::Query)?,
        user_id: row.try_get("user_id").map_err(StorageError::Query)?,
        current_question_num: row.try_get::<i32, _>("current_question_num").map_err(StorageError::Query)? as u32,
        correct_answers: row.try_get::<i32, _>("correct_answers").map_err(StorageError::Query)? as u32,
        total_questions: row.try_get::<i32, _>("total_questions").map_err(StorageError::Query)? as u32,
        quiz_mode: QuizMode::parse(&quiz_mode_raw).unwrap_or_default(),
        session_status: SessionStatus::parse(&status_raw).unwrap_or(SessionStatus::Active),
        started_at: row.try_get("started_at").map_err(StorageError::Query)?,
        completed_at: row.try_get("completed_at").map_err(StorageError::Query)?,
        version: row.try_get("version").map_err(StorageError::Query)?,
    })
}

fn question_from_row(row: sqlx::postgres::PgRow) -> anyhow::Result<QuizQuestion> {
    let question_type_raw: String = row.try_get("question_type").map_err(StorageError::Query)?;
    Ok(QuizQuestion {
        id: row.try_get("id").map_err(StorageError::Query)?,
        session_id: row.try_get("session_id").map_err(StorageError::Query)?,
        question_order: row.try_get::<i32, _>("question_order").map_err(StorageError::Query)? as u32,
        name_number: row.try_get::<i16, _>("name_number").map_err(StorageError::Query)? as u8,
        question_type: QuestionType::parse(&question_type_raw).unwrap_or(QuestionType::Translation),
        options: row.try_get("options").map_err(StorageError::Query)?,
        correct_index: row.try_get::<i16, _>("correct_index").map_err(StorageError::Query)? as u8,
        correct_answer: row.try_get("correct_answer").map_err(StorageError::Query)?,
        created_at: row.try_get("created_at").map_err(StorageError::Query)?,
    })
}

fn progress_from_row(row: &sqlx::postgres::PgRow) -> sqlx::Result<Progress> {
    let phase_raw: String = row.try_get("phase")?;
    Ok(Progress {
        user_id: row.try_get("user_id")?,
        name_number: row.try_get::<i16, _>("name_number")? as u8,
        phase: names_core::domain::Phase::parse(&phase_raw).unwrap_or(names_core::domain::Phase::New),
        ease: row.try_get("ease")?,
        streak: row.try_get::<i32, _>("streak")? as u32,
        interval_days: row.try_get::<i32, _>("interval_days")? as u32,
        next_review_at: row.try_get("next_review_at")?,
        review_count: row.try_get::<i32, _>("review_count")? as u32,
        correct_count: row.try_get::<i32, _>("correct_count")? as u32,
        first_seen_at: row.try_get("first_seen_at")?,
        last_reviewed_at: row.try_get("last_reviewed_at")?,
    })
}
