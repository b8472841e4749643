use crate::domain::{Progress, ProgressStats};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Per-(user, item) SRS state and the read cohorts the selection and
/// plan layers draw from (spec §4.2).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn get(&self, user_id: &str, name_number: u8) -> anyhow::Result<Option<Progress>>;

    async fn get_by_numbers(
        &self,
        user_id: &str,
        numbers: &[u8],
    ) -> anyhow::Result<HashMap<u8, Progress>>;

    /// Not-found resolves to `0`, per spec.
    async fn get_streak(&self, user_id: &str, name_number: u8) -> anyhow::Result<u32>;

    /// `next_review_at <= now`, ordered by `next_review_at` ascending.
    async fn names_due_for_review(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        limit: u32,
    ) -> anyhow::Result<Vec<u8>>;

    /// `phase=learning` and `next_review_at IS NULL OR <= now`, ordered
    /// by `COALESCE(next_review_at, last_reviewed_at)` nulls first.
    async fn learning_names(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        limit: u32,
    ) -> anyhow::Result<Vec<u8>>;

    /// Items with no Progress row, ascending item number.
    async fn names_for_introduction(
        &self,
        user_id: &str,
        limit: u32,
    ) -> anyhow::Result<Vec<u8>>;

    /// Union of no-progress items and `phase=new && review_count < 2`,
    /// ascending item number.
    async fn new_names(&self, user_id: &str, limit: u32) -> anyhow::Result<Vec<u8>>;

    /// `phase in {learning, mastered} && review_count > 0`, sampled
    /// uniformly without replacement.
    async fn random_reinforcement(
        &self,
        user_id: &str,
        limit: u32,
    ) -> anyhow::Result<Vec<u8>>;

    async fn next_due_name(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<u8>>;

    async fn stats(&self, user_id: &str, now: DateTime<Utc>) -> anyhow::Result<ProgressStats>;

    /// Inserts or updates all SRS fields. `first_seen_at` is preserved
    /// if a row already exists.
    async fn upsert(&self, progress: &Progress) -> anyhow::Result<()>;

    /// Idempotent: does nothing if a row already exists.
    async fn mark_introduced(
        &self,
        user_id: &str,
        name_number: u8,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()>;

    /// Deletes every Progress row for `user_id`. Used by `reset`.
    async fn delete_all(&self, user_id: &str) -> anyhow::Result<()>;
}
