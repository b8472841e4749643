//! Range/enum validation for Settings updates (spec §4.8, §3). Values
//! that fail validation are rejected here and logged; the spec
//! requires no state change, not an error surfaced to the end user, so
//! callers that want a silent no-op should match on
//! [`CoreError::Validation`] and swallow it at the handler layer.

use crate::domain::{CoreError, LearningMode, QuizMode, Result, Settings, DEFAULT_NAMES_PER_DAY};
use crate::ports::SettingsStore;
use std::sync::Arc;

pub const NAMES_PER_DAY_RANGE: std::ops::RangeInclusive<u8> = 1..=20;

pub struct SettingsService {
    settings_store: Arc<dyn SettingsStore>,
}

impl SettingsService {
    pub fn new(settings_store: Arc<dyn SettingsStore>) -> Self {
        Self { settings_store }
    }

    pub async fn get_or_create(&self, user_id: &str) -> Result<Settings> {
        Ok(self.settings_store.get_or_create(user_id).await?)
    }

    pub async fn update_names_per_day(&self, user_id: &str, value: u8) -> Result<()> {
        if !NAMES_PER_DAY_RANGE.contains(&value) {
            tracing::warn!(user_id, value, "rejected out-of-range names_per_day");
            return Err(CoreError::validation(format!(
                "names_per_day must be in [{}, {}]",
                NAMES_PER_DAY_RANGE.start(),
                NAMES_PER_DAY_RANGE.end()
            )));
        }
        self.settings_store.update_names_per_day(user_id, value).await?;
        Ok(())
    }

    pub async fn update_quiz_mode(&self, user_id: &str, raw: &str) -> Result<()> {
        let mode = QuizMode::parse(raw).ok_or_else(|| {
            tracing::warn!(user_id, raw, "rejected unknown quiz_mode");
            CoreError::validation(format!("unknown quiz_mode: {raw}"))
        })?;
        self.settings_store.update_quiz_mode(user_id, mode).await?;
        Ok(())
    }

    pub async fn update_learning_mode(&self, user_id: &str, raw: &str) -> Result<()> {
        let mode = LearningMode::parse(raw).ok_or_else(|| {
            tracing::warn!(user_id, raw, "rejected unknown learning_mode");
            CoreError::validation(format!("unknown learning_mode: {raw}"))
        })?;
        self.settings_store.update_learning_mode(user_id, mode).await?;
        Ok(())
    }

    pub async fn update_timezone(&self, user_id: &str, raw: &str) -> Result<()> {
        crate::clock::TimeZoneSpec::parse(raw)?;
        self.settings_store.update_timezone(user_id, raw).await?;
        Ok(())
    }

    pub async fn update_max_reviews_per_day(&self, user_id: &str, value: u32) -> Result<()> {
        if value == 0 {
            tracing::warn!(user_id, value, "rejected zero max_reviews_per_day");
            return Err(CoreError::validation("max_reviews_per_day must be > 0"));
        }
        self.settings_store
            .update_max_reviews_per_day(user_id, value)
            .await?;
        Ok(())
    }
}

/// `⌈(99 - learned) / names_per_day⌉`, `0` once everything is learned,
/// falling back to [`DEFAULT_NAMES_PER_DAY`] for a zeroed `names_per_day`.
pub fn days_to_complete(settings: &Settings, learned: u32) -> u32 {
    let per_day = if settings.names_per_day == 0 {
        DEFAULT_NAMES_PER_DAY
    } else {
        settings.names_per_day
    };
    let mut s = settings.clone();
    s.names_per_day = per_day;
    s.days_to_complete(learned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockSettingsStore;

    #[tokio::test]
    async fn rejects_names_per_day_out_of_range() {
        let store = MockSettingsStore::new();
        let service = SettingsService::new(Arc::new(store));
        let err = service.update_names_per_day("u1", 0).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        let err = service.update_names_per_day("u1", 21).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn accepts_names_per_day_in_range() {
        let mut store = MockSettingsStore::new();
        store
            .expect_update_names_per_day()
            .withf(|_, v| *v == 5)
            .returning(|_, _| Ok(()));
        let service = SettingsService::new(Arc::new(store));
        service.update_names_per_day("u1", 5).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_unknown_quiz_mode() {
        let store = MockSettingsStore::new();
        let service = SettingsService::new(Arc::new(store));
        let err = service.update_quiz_mode("u1", "bogus").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_unparseable_timezone() {
        let store = MockSettingsStore::new();
        let service = SettingsService::new(Arc::new(store));
        let err = service.update_timezone("u1", "Not/AZone").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
