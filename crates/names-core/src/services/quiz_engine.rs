//! Session lifecycle: start, read the current question, submit an
//! answer (spec §4.5).

use crate::clock::TimeZoneSpec;
use crate::domain::{CoreError, QuestionType, QuizSession, Result, SessionStatus, SubmitOutcome};
use crate::ports::{Catalog, NewQuizQuestion, QuizStore, SettingsStore, SubmitAnswerOutcome};
use crate::services::option_synthesizer;
use crate::services::question_selector::QuestionSelector;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use std::sync::Arc;

/// The cycle questions are drawn from; `translation` appears twice by
/// design (spec §4.5 step 6).
const QUESTION_TYPE_CYCLE: [QuestionType; 4] = [
    QuestionType::Translation,
    QuestionType::Translation,
    QuestionType::Meaning,
    QuestionType::Arabic,
];

pub struct QuizEngine {
    quiz_store: Arc<dyn QuizStore>,
    settings_store: Arc<dyn SettingsStore>,
    catalog: Arc<dyn Catalog>,
    selector: QuestionSelector,
}

impl QuizEngine {
    pub fn new(
        quiz_store: Arc<dyn QuizStore>,
        settings_store: Arc<dyn SettingsStore>,
        catalog: Arc<dyn Catalog>,
        selector: QuestionSelector,
    ) -> Self {
        Self {
            quiz_store,
            settings_store,
            catalog,
            selector,
        }
    }

    pub async fn start_session(
        &self,
        user_id: &str,
        total_questions: u32,
        now: DateTime<Utc>,
    ) -> Result<QuizSession> {
        self.quiz_store.abandon_active_sessions(user_id).await?;

        let settings = self.settings_store.get_or_create(user_id).await?;
        let tz = TimeZoneSpec::parse(&settings.timezone)?;

        let numbers = self
            .selector
            .select(
                user_id,
                total_questions,
                settings.quiz_mode,
                settings.learning_mode,
                &tz,
                now,
            )
            .await?;

        if numbers.is_empty() {
            return Err(CoreError::NoQuestionsAvailable(format!(
                "no candidates for learning_mode={:?} quiz_mode={:?}",
                settings.learning_mode, settings.quiz_mode
            )));
        }

        let items = self.catalog.by_numbers(&numbers);
        let n = items.len() as u32;

        let session_id = uuid::Uuid::new_v4().to_string();
        let session = QuizSession {
            id: session_id.clone(),
            user_id: user_id.to_string(),
            current_question_num: 1,
            correct_answers: 0,
            total_questions: n,
            quiz_mode: settings.quiz_mode,
            session_status: SessionStatus::Active,
            started_at: now,
            completed_at: None,
            version: 0,
        };

        let mut rng = rand::thread_rng();
        let mut questions = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let question_type = *QUESTION_TYPE_CYCLE.choose(&mut rng).expect("non-empty cycle");
            let (options, correct_index) =
                option_synthesizer::synthesize(item, question_type, &self.catalog.all());
            let correct_answer = question_type.answer_field(item);
            questions.push(NewQuizQuestion {
                question_order: (i + 1) as u32,
                name_number: item.number,
                question_type,
                options,
                correct_index,
                correct_answer,
            });
        }

        self.quiz_store
            .create_session_with_questions(&session, &questions)
            .await?;

        Ok(session)
    }

    pub async fn current(
        &self,
        session_id: &str,
        question_num: u32,
    ) -> Result<(crate::domain::QuizQuestion, crate::domain::Item)> {
        let question = self
            .quiz_store
            .get_question(session_id, question_num)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("question {question_num} of session {session_id}")))?;
        let item = self
            .catalog
            .by_number(question.name_number)
            .ok_or_else(|| CoreError::not_found(format!("catalog item {}", question.name_number)))?;
        Ok((question, item))
    }

    pub async fn submit(
        &self,
        session_id: &str,
        user_id: &str,
        option_index_raw: &str,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome> {
        let option_index: i64 = option_index_raw
            .trim()
            .parse()
            .map_err(|_| CoreError::validation(format!("invalid option index: {option_index_raw}")))?;

        let outcome = self
            .quiz_store
            .submit_answer(session_id, user_id, option_index, now)
            .await?;

        match outcome {
            SubmitAnswerOutcome::Accepted {
                is_correct,
                correct_answer,
                name_number,
                is_session_complete,
                score,
                total,
            } => Ok(SubmitOutcome {
                is_correct,
                correct_answer,
                name_number,
                is_session_complete,
                score,
                total,
                session_id: session_id.to_string(),
            }),
            SubmitAnswerOutcome::SessionNotFound => {
                Err(CoreError::not_found(format!("session {session_id}")))
            }
            SubmitAnswerOutcome::SessionNotActive => {
                Err(CoreError::conflict("session is not active"))
            }
            SubmitAnswerOutcome::OptimisticLockFailed => Err(CoreError::conflict(
                "optimistic lock: answer already submitted",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Settings;
    use crate::ports::{MockCatalog, MockPlanStore, MockProgressStore, MockQuizStore, MockSettingsStore};
    use chrono::TimeZone as _;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn start_session_fails_with_no_questions_available() {
        let mut quiz_store = MockQuizStore::new();
        quiz_store
            .expect_abandon_active_sessions()
            .returning(|_| Ok(()));

        let mut settings_store = MockSettingsStore::new();
        settings_store
            .expect_get_or_create()
            .returning(|id| Ok(Settings::defaults(id)));

        let catalog = MockCatalog::new();

        let mut progress_store = MockProgressStore::new();
        progress_store
            .expect_names_due_for_review()
            .returning(|_, _, _| Ok(vec![]));
        progress_store
            .expect_learning_names()
            .returning(|_, _, _| Ok(vec![]));
        progress_store
            .expect_random_reinforcement()
            .returning(|_, _| Ok(vec![]));

        let mut plan_store = MockPlanStore::new();
        plan_store
            .expect_names_for_date()
            .returning(|_, _| Ok(vec![]));

        let engine = QuizEngine::new(
            Arc::new(quiz_store),
            Arc::new(settings_store),
            Arc::new(catalog),
            QuestionSelector::new(Arc::new(progress_store), Arc::new(plan_store)),
        );

        let err = engine.start_session("user-1", 5, now()).await.unwrap_err();
        assert!(matches!(err, CoreError::NoQuestionsAvailable(_)));
    }

    #[tokio::test]
    async fn submit_maps_optimistic_lock_to_conflict_error() {
        let mut quiz_store = MockQuizStore::new();
        quiz_store
            .expect_submit_answer()
            .returning(|_, _, _, _| Ok(SubmitAnswerOutcome::OptimisticLockFailed));

        let settings_store = MockSettingsStore::new();
        let catalog = MockCatalog::new();
        let progress_store = MockProgressStore::new();
        let plan_store = MockPlanStore::new();
        let selector = QuestionSelector::new(Arc::new(progress_store), Arc::new(plan_store));

        let engine = QuizEngine::new(
            Arc::new(quiz_store),
            Arc::new(settings_store),
            Arc::new(catalog),
            selector,
        );

        let err = engine
            .submit("session-1", "user-1", "2", now())
            .await
            .unwrap_err();
        assert!(err.is_optimistic_lock());
    }

    #[tokio::test]
    async fn submit_rejects_non_numeric_option_index() {
        let quiz_store = MockQuizStore::new();
        let settings_store = MockSettingsStore::new();
        let catalog = MockCatalog::new();
        let progress_store = MockProgressStore::new();
        let plan_store = MockPlanStore::new();
        let selector = QuestionSelector::new(Arc::new(progress_store), Arc::new(plan_store));

        let engine = QuizEngine::new(
            Arc::new(quiz_store),
            Arc::new(settings_store),
            Arc::new(catalog),
            selector,
        );

        let err = engine
            .submit("session-1", "user-1", "not-a-number", now())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
