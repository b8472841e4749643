use crate::domain::{QuizQuestion, QuizSession};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A question to persist alongside a freshly created session. Built by
/// [`crate::services::quiz_engine`] before the transaction opens.
#[derive(Debug, Clone)]
pub struct NewQuizQuestion {
    pub question_order: u32,
    pub name_number: u8,
    pub question_type: crate::domain::QuestionType,
    pub options: Vec<String>,
    pub correct_index: u8,
    pub correct_answer: String,
}

/// Row-level outcome of a `submit_answer` call, distinguishing the
/// storage-level failure modes from the shared business-logic error
/// path (spec §4.5 step 3, 10). `QuizEngine` maps these onto
/// [`crate::domain::CoreError`].
#[derive(Debug, Clone)]
pub enum SubmitAnswerOutcome {
    Accepted {
        is_correct: bool,
        correct_answer: String,
        name_number: u8,
        is_session_complete: bool,
        score: u32,
        total: u32,
    },
    SessionNotFound,
    SessionNotActive,
    OptimisticLockFailed,
}

/// Quiz sessions, their questions, and the single atomic submit
/// operation that ties a session update to a Progress update (spec
/// §4.5). The transaction spanning both tables is an implementation
/// detail of the storage adapter, not something the port exposes.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// `UPDATE ... SET session_status='abandoned' WHERE user=? AND status='active'`.
    async fn abandon_active_sessions(&self, user_id: &str) -> anyhow::Result<()>;

    /// Creates the session and all of its questions in one transaction.
    async fn create_session_with_questions(
        &self,
        session: &QuizSession,
        questions: &[NewQuizQuestion],
    ) -> anyhow::Result<()>;

    async fn get_session(&self, session_id: &str) -> anyhow::Result<Option<QuizSession>>;

    async fn get_question(
        &self,
        session_id: &str,
        question_order: u32,
    ) -> anyhow::Result<Option<QuizQuestion>>;

    /// Locks the session row, records the answer, advances SRS state
    /// for `name_number`, and advances/completes the session — all
    /// inside one transaction guarded by the session's `version` column.
    #[allow(clippy::too_many_arguments)]
    async fn submit_answer(
        &self,
        session_id: &str,
        user_id: &str,
        raw_option_index: i64,
        now: DateTime<Utc>,
    ) -> anyhow::Result<SubmitAnswerOutcome>;

    /// Deletes every session, question, and answer for `user_id`. Used by `reset`.
    async fn delete_all(&self, user_id: &str) -> anyhow::Result<()>;
}
