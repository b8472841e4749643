pub mod option_synthesizer;
pub mod plan_engine;
pub mod question_selector;
pub mod quiz_engine;
pub mod reminder_scheduler;
pub mod reset;
pub mod settings_service;

pub use plan_engine::PlanEngine;
pub use question_selector::QuestionSelector;
pub use quiz_engine::QuizEngine;
pub use reminder_scheduler::ReminderScheduler;
pub use reset::ResetService;
pub use settings_service::SettingsService;
