use crate::domain::{LearningMode, QuizMode, Settings};
use async_trait::async_trait;

/// Per-user preferences (spec §4.8). Range/enum validation is the
/// caller's responsibility — these setters persist whatever they're
/// given, and `Settings`-level helpers surface validation failures.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the existing row or inserts defaults and returns those.
    async fn get_or_create(&self, user_id: &str) -> anyhow::Result<Settings>;

    async fn update_names_per_day(&self, user_id: &str, value: u8) -> anyhow::Result<()>;
    async fn update_quiz_mode(&self, user_id: &str, value: QuizMode) -> anyhow::Result<()>;
    async fn update_learning_mode(&self, user_id: &str, value: LearningMode) -> anyhow::Result<()>;
    async fn update_timezone(&self, user_id: &str, value: &str) -> anyhow::Result<()>;
    async fn update_max_reviews_per_day(&self, user_id: &str, value: u32) -> anyhow::Result<()>;

    /// Overwrites the row with [`Settings::defaults`]. Used by `reset`.
    async fn reset_to_defaults(&self, user_id: &str) -> anyhow::Result<Settings>;
}
