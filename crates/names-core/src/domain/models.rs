use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the 99 catalog entries. Immutable once the catalog is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub number: u8,
    pub arabic: String,
    pub transliteration: String,
    pub translation: String,
    pub meaning: String,
    pub audio_ref: Option<String>,
}

/// Number of catalog entries a fully loaded catalog must contain.
pub const CATALOG_SIZE: usize = 99;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub chat_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
    New,
    Review,
    Mixed,
}

impl Default for QuizMode {
    fn default() -> Self {
        QuizMode::Mixed
    }
}

impl QuizMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "review" => Some(Self::Review),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuizMode::New => "new",
            QuizMode::Review => "review",
            QuizMode::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningMode {
    Guided,
    Free,
}

impl Default for LearningMode {
    fn default() -> Self {
        LearningMode::Guided
    }
}

impl LearningMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "guided" => Some(Self::Guided),
            "free" => Some(Self::Free),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningMode::Guided => "guided",
            LearningMode::Free => "free",
        }
    }
}

/// Per-user preferences. Created with defaults the first time any
/// subsystem needs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub user_id: String,
    pub names_per_day: u8,
    pub quiz_mode: QuizMode,
    pub learning_mode: LearningMode,
    pub timezone: String,
    pub max_reviews_per_day: u32,
}

pub const DEFAULT_NAMES_PER_DAY: u8 = 1;
pub const DEFAULT_MAX_REVIEWS_PER_DAY: u32 = 50;
pub const DEFAULT_TIMEZONE: &str = "UTC";

impl Settings {
    pub fn defaults(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            names_per_day: DEFAULT_NAMES_PER_DAY,
            quiz_mode: QuizMode::default(),
            learning_mode: LearningMode::default(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            max_reviews_per_day: DEFAULT_MAX_REVIEWS_PER_DAY,
        }
    }

    /// `ceil((99 - learned) / names_per_day)`, 0 once everything is learned.
    pub fn days_to_complete(&self, learned: u32) -> u32 {
        let remaining = (CATALOG_SIZE as u32).saturating_sub(learned);
        if remaining == 0 {
            return 0;
        }
        let per_day = self.names_per_day.max(1) as u32;
        (remaining + per_day - 1) / per_day
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    New,
    Learning,
    Mastered,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::New => "new",
            Phase::Learning => "learning",
            Phase::Mastered => "mastered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "learning" => Some(Self::Learning),
            "mastered" => Some(Self::Mastered),
            _ => None,
        }
    }
}

/// Per (user, item) SRS state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub user_id: String,
    pub name_number: u8,
    pub phase: Phase,
    pub ease: f64,
    pub streak: u32,
    pub interval_days: u32,
    pub next_review_at: Option<DateTime<Utc>>,
    pub review_count: u32,
    pub correct_count: u32,
    pub first_seen_at: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl Progress {
    pub fn new(user_id: impl Into<String>, name_number: u8, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            name_number,
            phase: Phase::New,
            ease: crate::srs::INITIAL_EASE,
            streak: 0,
            interval_days: 0,
            next_review_at: None,
            review_count: 0,
            correct_count: 0,
            first_seen_at: now,
            last_reviewed_at: None,
        }
    }

    /// The row `markIntroduced` writes: phase=new, streak=0, interval=1,
    /// next review in 24h.
    pub fn introduced(user_id: impl Into<String>, name_number: u8, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            name_number,
            phase: Phase::New,
            ease: crate::srs::INITIAL_EASE,
            streak: 0,
            interval_days: 1,
            next_review_at: Some(now + chrono::Duration::hours(24)),
            review_count: 0,
            correct_count: 0,
            first_seen_at: now,
            last_reviewed_at: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at.map(|t| t <= now).unwrap_or(false)
    }
}

/// Aggregate statistics over a user's progress rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ProgressStats {
    pub total_viewed: u32,
    pub new_count: u32,
    pub learning_count: u32,
    pub mastered_count: u32,
    pub due_today: u32,
    pub accuracy: f64,
    pub last_activity: Option<DateTime<Utc>>,
    pub average_ease: f64,
}

impl ProgressStats {
    pub fn learned(&self) -> u32 {
        self.mastered_count
    }

    pub fn in_progress(&self) -> u32 {
        self.new_count + self.learning_count
    }

    pub fn not_started(&self) -> u32 {
        (CATALOG_SIZE as u32).saturating_sub(self.total_viewed)
    }
}

/// A single slot in a user's plan for a given UTC day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub user_id: String,
    pub date_utc: DateTime<Utc>,
    pub name_number: u8,
    pub slot_index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    New,
    Review,
    Study,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::New => "new",
            ReminderKind::Review => "review",
            ReminderKind::Study => "study",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "review" => Some(Self::Review),
            "study" => Some(Self::Study),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub user_id: String,
    pub is_enabled: bool,
    pub interval_hours: u8,
    /// Local time-of-day, "HH:MM:SS".
    pub start_time: String,
    pub end_time: String,
    pub last_sent_at: Option<DateTime<Utc>>,
    pub next_send_at: Option<DateTime<Utc>>,
    pub last_kind: ReminderKind,
}

impl ReminderConfig {
    pub fn defaults(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_enabled: true,
            interval_hours: 1,
            start_time: "08:00:00".to_string(),
            end_time: "20:00:00".to_string(),
            last_sent_at: None,
            next_send_at: None,
            last_kind: ReminderKind::New,
        }
    }

    pub fn can_send_now(&self, now: DateTime<Utc>) -> bool {
        self.is_enabled && self.next_send_at.map(|t| now >= t).unwrap_or(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
    Abandoned,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Abandoned => "abandoned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: String,
    pub user_id: String,
    pub current_question_num: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub quiz_mode: QuizMode,
    pub session_status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub version: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Translation,
    Transliteration,
    Meaning,
    Arabic,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Translation => "translation",
            QuestionType::Transliteration => "transliteration",
            QuestionType::Meaning => "meaning",
            QuestionType::Arabic => "arabic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "translation" => Some(Self::Translation),
            "transliteration" => Some(Self::Transliteration),
            "meaning" => Some(Self::Meaning),
            "arabic" => Some(Self::Arabic),
            _ => None,
        }
    }

    /// The field of an [`Item`] that holds the correct-answer text for this
    /// question type (spec §4.6).
    pub fn answer_field(&self, item: &Item) -> String {
        match self {
            QuestionType::Translation => item.arabic.clone(),
            QuestionType::Transliteration => item.translation.clone(),
            QuestionType::Meaning => item.transliteration.clone(),
            QuestionType::Arabic => item.translation.clone(),
        }
    }

    pub fn prompt(&self, item: &Item) -> String {
        match self {
            QuestionType::Translation => {
                format!("Which Arabic name means: {}?", item.translation)
            }
            QuestionType::Transliteration => {
                format!("What does {} mean?", item.transliteration)
            }
            QuestionType::Meaning => {
                format!("Which name matches: {}?", item.meaning)
            }
            QuestionType::Arabic => format!("What does {} mean?", item.arabic),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub session_id: String,
    pub question_order: u32,
    pub name_number: u8,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub correct_index: u8,
    pub correct_answer: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub session_id: String,
    pub question_id: String,
    pub user_id: String,
    pub name_number: u8,
    pub user_answer_text: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// The two answer qualities `SRSCore` actually uses. `Hard` is reserved
/// per spec §9 Open Question (a) but never produced by `QuizEngine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerQuality {
    Fail,
    Hard,
    Good,
}

/// Outcome of a successful `QuizEngine::submit` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub is_correct: bool,
    pub correct_answer: String,
    pub name_number: u8,
    pub is_session_complete: bool,
    pub score: u32,
    pub total: u32,
    pub session_id: String,
}
