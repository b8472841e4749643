#![cfg(feature = "postgres-tests")]

use chrono::Utc;
use sqlx::PgPool;

use names_core::domain::{QuestionType, QuizMode, QuizSession, SessionStatus};
use names_core::ports::{NewQuizQuestion, QuizStore, SubmitAnswerOutcome, UserRegistry};
use names_storage::{QuizRepository, UserRepository};

fn new_session(user_id: &str, total_questions: u32) -> QuizSession {
    QuizSession {
        id: "sess-1".into(),
        user_id: user_id.into(),
        current_question_num: 1,
        correct_answers: 0,
        total_questions,
        quiz_mode: QuizMode::Mixed,
        session_status: SessionStatus::Active,
        started_at: Utc::now(),
        completed_at: None,
        version: 0,
    }
}

fn new_question(order: u32, correct_index: u8) -> NewQuizQuestion {
    NewQuizQuestion {
        question_order: order,
        name_number: 1,
        question_type: QuestionType::Translation,
        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct_index,
        correct_answer: "b".into(),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn submit_answer_advances_session_and_updates_progress(
    pool: PgPool,
) -> Result<(), sqlx::Error> {
    let users = UserRepository::new(pool.clone());
    let quiz = QuizRepository::new(pool.clone());

    users
        .ensure_user("learner", "chat")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let session = new_session("learner", 2);
    let questions = vec![new_question(1, 1), new_question(2, 0)];
    quiz.create_session_with_questions(&session, &questions)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let outcome = quiz
        .submit_answer("sess-1", "learner", 1, Utc::now())
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    match outcome {
        SubmitAnswerOutcome::Accepted {
            is_correct,
            is_session_complete,
            score,
            ..
        } => {
            assert!(is_correct);
            assert!(!is_session_complete);
            assert_eq!(score, 1);
        }
        other => panic!("expected Accepted, got {other:?}"),
    }

    let updated = quiz
        .get_session("sess-1")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?
        .expect("session should exist");
    assert_eq!(updated.current_question_num, 2);
    assert_eq!(updated.version, 1);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn submit_answer_on_last_question_completes_session(
    pool: PgPool,
) -> Result<(), sqlx::Error> {
    let users = UserRepository::new(pool.clone());
    let quiz = QuizRepository::new(pool.clone());

    users
        .ensure_user("learner", "chat")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    let session = new_session("learner", 1);
    let questions = vec![new_question(1, 1)];
    quiz.create_session_with_questions(&session, &questions)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    // Wrong answer: option 0 when the correct index is 1.
    let outcome = quiz
        .submit_answer("sess-1", "learner", 0, Utc::now())
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    match outcome {
        SubmitAnswerOutcome::Accepted {
            is_correct,
            is_session_complete,
            score,
            total,
            ..
        } => {
            assert!(!is_correct);
            assert!(is_session_complete);
            assert_eq!(score, 0);
            assert_eq!(total, 1);
        }
        other => panic!("expected Accepted, got {other:?}"),
    }

    let updated = quiz
        .get_session("sess-1")
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?
        .expect("session should exist");
    assert_eq!(updated.session_status, SessionStatus::Completed);
    assert!(updated.completed_at.is_some());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn submit_answer_against_unknown_session_reports_not_found(
    pool: PgPool,
) -> Result<(), sqlx::Error> {
    let quiz = QuizRepository::new(pool.clone());

    let outcome = quiz
        .submit_answer("missing", "nobody", 0, Utc::now())
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;

    assert!(matches!(outcome, SubmitAnswerOutcome::SessionNotFound));

    Ok(())
}
