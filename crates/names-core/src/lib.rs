pub mod clock;
pub mod domain;
pub mod ports;
pub mod services;
pub mod srs;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use clock::TimeZoneSpec;
pub use domain::{
    AnswerQuality, CoreError, Item, LearningMode, Phase, PlanEntry, Progress, ProgressStats,
    QuestionType, QuizAnswer, QuizMode, QuizQuestion, QuizSession, ReminderConfig, ReminderKind,
    Result, SessionStatus, Settings, SubmitOutcome, User, CATALOG_SIZE,
};
pub use ports::{
    Catalog, Notifier, PlanStore, ProgressStore, QuizStore, ReminderPayload, ReminderStore,
    SettingsStore, Transactor, UserRegistry,
};
pub use services::{PlanEngine, QuestionSelector, QuizEngine, ReminderScheduler, ResetService, SettingsService};
