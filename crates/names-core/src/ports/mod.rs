pub mod catalog;
pub mod notifier;
pub mod plan_store;
pub mod progress_store;
pub mod quiz_store;
pub mod reminder_store;
pub mod settings_store;
pub mod transactor;
pub mod user_registry;

pub use catalog::Catalog;
pub use notifier::{Notifier, ReminderPayload};
pub use plan_store::PlanStore;
pub use progress_store::ProgressStore;
pub use quiz_store::{NewQuizQuestion, QuizStore, SubmitAnswerOutcome};
pub use reminder_store::ReminderStore;
pub use settings_store::SettingsStore;
pub use transactor::Transactor;
pub use user_registry::UserRegistry;

#[cfg(any(test, feature = "testing"))]
pub use catalog::MockCatalog;
#[cfg(any(test, feature = "testing"))]
pub use notifier::MockNotifier;
#[cfg(any(test, feature = "testing"))]
pub use plan_store::MockPlanStore;
#[cfg(any(test, feature = "testing"))]
pub use progress_store::MockProgressStore;
#[cfg(any(test, feature = "testing"))]
pub use quiz_store::MockQuizStore;
#[cfg(any(test, feature = "testing"))]
pub use reminder_store::MockReminderStore;
#[cfg(any(test, feature = "testing"))]
pub use settings_store::MockSettingsStore;
#[cfg(any(test, feature = "testing"))]
pub use transactor::MockTransactor;
#[cfg(any(test, feature = "testing"))]
pub use user_registry::MockUserRegistry;
