//! Merges SRS cohorts into one ordered, deduplicated list of item
//! numbers under quiz-mode / learning-mode policy (spec §4.4).

use crate::clock::TimeZoneSpec;
use crate::domain::{LearningMode, QuizMode};
use crate::ports::{PlanStore, ProgressStore};
use crate::srs::MIN_STREAK_FOR_MASTERY;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::sync::Arc;

pub struct QuestionSelector {
    progress_store: Arc<dyn ProgressStore>,
    plan_store: Arc<dyn PlanStore>,
}

/// `clamp(total*40/100, 1, total)`.
pub fn calc_due(total: u32) -> u32 {
    ((total * 40) / 100).clamp(1, total.max(1))
}

/// `clamp(total*30/100, 1, remaining)`.
pub fn calc_learning(total: u32, remaining: u32) -> u32 {
    if remaining == 0 {
        return 0;
    }
    ((total * 30) / 100).clamp(1, remaining)
}

/// Appends `items` to `out`, skipping numbers already present and
/// stopping once `out` reaches `total`. Preserves first-occurrence order.
fn dedup_extend(out: &mut Vec<u8>, seen: &mut HashSet<u8>, items: Vec<u8>, total: u32) {
    for number in items {
        if out.len() as u32 >= total {
            break;
        }
        if seen.insert(number) {
            out.push(number);
        }
    }
}

impl QuestionSelector {
    pub fn new(progress_store: Arc<dyn ProgressStore>, plan_store: Arc<dyn PlanStore>) -> Self {
        Self {
            progress_store,
            plan_store,
        }
    }

    pub async fn select(
        &self,
        user_id: &str,
        total: u32,
        quiz_mode: QuizMode,
        learning_mode: LearningMode,
        tz: &TimeZoneSpec,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<u8>> {
        if total == 0 {
            return Ok(Vec::new());
        }

        match (learning_mode, quiz_mode) {
            (LearningMode::Guided, QuizMode::New) => {
                self.debt_policy(user_id, total, tz, now).await
            }
            (LearningMode::Guided, QuizMode::Review) => {
                self.review_only(user_id, total, now).await
            }
            (LearningMode::Guided, QuizMode::Mixed) => {
                self.guided_mixed(user_id, total, tz, now).await
            }
            (LearningMode::Free, QuizMode::New) => self.free_new(user_id, total).await,
            (LearningMode::Free, QuizMode::Review) => {
                self.review_only(user_id, total, now).await
            }
            (LearningMode::Free, QuizMode::Mixed) => self.free_mixed(user_id, total, now).await,
        }
    }

    /// `guided/new`: debt (<=1 if `hasUnfinishedDays`) then today-plan
    /// items filtered not-mastered.
    async fn debt_policy(
        &self,
        user_id: &str,
        total: u32,
        tz: &TimeZoneSpec,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();

        if self.plan_store.has_unfinished_days(user_id).await? {
            if let Some(number) = self.plan_store.oldest_unfinished_name(user_id).await? {
                dedup_extend(&mut out, &mut seen, vec![number], total.min(1));
            }
        }

        if (out.len() as u32) < total {
            let today = self.today_plan_not_mastered(user_id, tz, now).await?;
            dedup_extend(&mut out, &mut seen, today, total);
        }

        Ok(out)
    }

    async fn review_only(
        &self,
        user_id: &str,
        total: u32,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();

        let due = self
            .progress_store
            .names_due_for_review(user_id, now, total)
            .await?;
        dedup_extend(&mut out, &mut seen, due, total);

        let remaining = total.saturating_sub(out.len() as u32);
        if remaining > 0 {
            let learning = self
                .progress_store
                .learning_names(user_id, now, remaining)
                .await?;
            dedup_extend(&mut out, &mut seen, learning, total);
        }

        let remaining = total.saturating_sub(out.len() as u32);
        if remaining > 0 {
            let reinforcement = self
                .progress_store
                .random_reinforcement(user_id, remaining)
                .await?;
            dedup_extend(&mut out, &mut seen, reinforcement, total);
        }

        Ok(out)
    }

    async fn guided_mixed(
        &self,
        user_id: &str,
        total: u32,
        tz: &TimeZoneSpec,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();

        let due_quota = calc_due(total);
        let due = self
            .progress_store
            .names_due_for_review(user_id, now, due_quota)
            .await?;
        dedup_extend(&mut out, &mut seen, due, total);

        let remaining = total.saturating_sub(out.len() as u32);
        if remaining > 0 {
            let today = self.today_plan_not_mastered(user_id, tz, now).await?;
            dedup_extend(&mut out, &mut seen, today, total);
        }

        let remaining = total.saturating_sub(out.len() as u32);
        if remaining > 0 {
            let learning_quota = calc_learning(total, remaining);
            let learning = self
                .progress_store
                .learning_names(user_id, now, learning_quota)
                .await?;
            dedup_extend(&mut out, &mut seen, learning, total);
        }

        let remaining = total.saturating_sub(out.len() as u32);
        if remaining > 0 {
            let reinforcement = self
                .progress_store
                .random_reinforcement(user_id, remaining)
                .await?;
            dedup_extend(&mut out, &mut seen, reinforcement, total);
        }

        out.shuffle(&mut rand::thread_rng());
        Ok(out)
    }

    async fn free_mixed(
        &self,
        user_id: &str,
        total: u32,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();

        let due_quota = calc_due(total);
        let due = self
            .progress_store
            .names_due_for_review(user_id, now, due_quota)
            .await?;
        dedup_extend(&mut out, &mut seen, due, total);

        let remaining = total.saturating_sub(out.len() as u32);
        if remaining > 0 {
            let learning_quota = calc_learning(total, remaining);
            let learning = self
                .progress_store
                .learning_names(user_id, now, learning_quota)
                .await?;
            dedup_extend(&mut out, &mut seen, learning, total);
        }

        let remaining = total.saturating_sub(out.len() as u32);
        if remaining > 0 {
            let fresh = self.progress_store.new_names(user_id, remaining).await?;
            dedup_extend(&mut out, &mut seen, fresh, total);
        }

        let remaining = total.saturating_sub(out.len() as u32);
        if remaining > 0 {
            let reinforcement = self
                .progress_store
                .random_reinforcement(user_id, remaining)
                .await?;
            dedup_extend(&mut out, &mut seen, reinforcement, total);
        }

        out.shuffle(&mut rand::thread_rng());
        Ok(out)
    }

    async fn free_new(&self, user_id: &str, total: u32) -> anyhow::Result<Vec<u8>> {
        self.progress_store.new_names(user_id, total).await
    }

    /// `namesForDate(user, today)` filtered by `getStreak < MIN_STREAK_FOR_MASTERY`
    /// (absent progress counts as not mastered).
    async fn today_plan_not_mastered(
        &self,
        user_id: &str,
        tz: &TimeZoneSpec,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Vec<u8>> {
        let today = tz
            .local_midnight_to_utc(now)
            .map_err(|e| anyhow::anyhow!(e))?;
        let planned = self.plan_store.names_for_date(user_id, today).await?;

        let mut filtered = Vec::with_capacity(planned.len());
        for number in planned {
            let streak = self.progress_store.get_streak(user_id, number).await?;
            if streak < MIN_STREAK_FOR_MASTERY {
                filtered.push(number);
            }
        }
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calc_due_is_clamped_to_total() {
        assert_eq!(calc_due(5), 2);
        assert_eq!(calc_due(1), 1);
        assert_eq!(calc_due(0), 0);
    }

    #[test]
    fn calc_learning_is_clamped_to_remaining() {
        assert_eq!(calc_learning(10, 5), 3);
        assert_eq!(calc_learning(10, 1), 1);
        assert_eq!(calc_learning(10, 0), 0);
    }

    #[test]
    fn dedup_extend_preserves_first_occurrence_order() {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        dedup_extend(&mut out, &mut seen, vec![3, 1, 3, 2], 10);
        assert_eq!(out, vec![3, 1, 2]);
    }

    #[test]
    fn dedup_extend_stops_at_total() {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        dedup_extend(&mut out, &mut seen, vec![1, 2, 3, 4], 2);
        assert_eq!(out, vec![1, 2]);
    }
}
