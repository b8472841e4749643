//! `ensureTodayPlan` (spec §4.3). Append-only: normal operation never
//! removes a planned item.

use crate::clock::TimeZoneSpec;
use crate::domain::Result;
use crate::ports::{PlanStore, ProgressStore, Transactor};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct PlanEngine {
    plan_store: Arc<dyn PlanStore>,
    progress_store: Arc<dyn ProgressStore>,
    transactor: Arc<dyn Transactor>,
}

impl PlanEngine {
    pub fn new(
        plan_store: Arc<dyn PlanStore>,
        progress_store: Arc<dyn ProgressStore>,
        transactor: Arc<dyn Transactor>,
    ) -> Self {
        Self {
            plan_store,
            progress_store,
            transactor,
        }
    }

    /// Ensures today's plan has `names_per_day` entries, backfilling
    /// with carry-over debt first and fresh introductions second. The
    /// candidate numbers are decided from reads against the stores,
    /// then inserted in one transaction via [`Transactor::fill_plan`]
    /// (spec §5: "PlanEngine debt/introduction fills should be one
    /// transaction per ensureTodayPlan invocation"). Returns the
    /// resolved today's-date UTC instant for convenience.
    pub async fn ensure_today_plan(
        &self,
        user_id: &str,
        tz: &TimeZoneSpec,
        names_per_day: u8,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        let today_date_utc = tz.local_midnight_to_utc(now)?;

        let mut today_set = self
            .plan_store
            .names_for_date(user_id, today_date_utc)
            .await?;
        let mut remaining = (names_per_day as i64) - (today_set.len() as i64);
        if remaining <= 0 {
            return Ok(today_date_utc);
        }

        let mut to_add: Vec<u8> = Vec::new();

        let carry_over = self
            .plan_store
            .carry_over_unfinished_from_past(user_id, today_date_utc, remaining as u32)
            .await?;
        for number in carry_over {
            if remaining <= 0 {
                break;
            }
            if today_set.contains(&number) {
                continue;
            }
            today_set.push(number);
            to_add.push(number);
            remaining -= 1;
        }

        while remaining > 0 {
            let introductions = self
                .progress_store
                .names_for_introduction(user_id, remaining as u32)
                .await?;
            let mut added_this_round = 0;
            for number in introductions {
                if remaining <= 0 {
                    break;
                }
                if today_set.contains(&number) {
                    continue;
                }
                today_set.push(number);
                to_add.push(number);
                remaining -= 1;
                added_this_round += 1;
            }
            if added_this_round == 0 {
                break;
            }
        }

        if !to_add.is_empty() {
            self.transactor
                .fill_plan(user_id, today_date_utc, &to_add)
                .await?;
        }

        Ok(today_date_utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockPlanStore, MockProgressStore, MockTransactor};
    use chrono::TimeZone as _;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn does_nothing_when_quota_already_met() {
        let mut plan = MockPlanStore::new();
        plan.expect_names_for_date()
            .returning(|_, _| Ok(vec![1, 2]));
        let progress = MockProgressStore::new();
        let transactor = MockTransactor::new();

        let engine = PlanEngine::new(Arc::new(plan), Arc::new(progress), Arc::new(transactor));
        let tz = TimeZoneSpec::parse("UTC").unwrap();
        engine.ensure_today_plan("u1", &tz, 2, now()).await.unwrap();
    }

    #[tokio::test]
    async fn introduces_fresh_items_when_no_carry_over() {
        let mut plan = MockPlanStore::new();
        plan.expect_names_for_date().returning(|_, _| Ok(vec![]));
        plan.expect_carry_over_unfinished_from_past()
            .returning(|_, _, _| Ok(vec![]));

        let mut progress = MockProgressStore::new();
        progress
            .expect_names_for_introduction()
            .times(1)
            .returning(|_, _| Ok(vec![7]));

        let mut transactor = MockTransactor::new();
        transactor
            .expect_fill_plan()
            .withf(|_, _, numbers| numbers == [7])
            .times(1)
            .returning(|_, _, _| Ok(()));

        let engine = PlanEngine::new(Arc::new(plan), Arc::new(progress), Arc::new(transactor));
        let tz = TimeZoneSpec::parse("UTC").unwrap();
        engine.ensure_today_plan("u1", &tz, 1, now()).await.unwrap();
    }

    #[tokio::test]
    async fn stops_when_a_round_adds_nothing() {
        let mut plan = MockPlanStore::new();
        plan.expect_names_for_date().returning(|_, _| Ok(vec![]));
        plan.expect_carry_over_unfinished_from_past()
            .returning(|_, _, _| Ok(vec![]));

        let mut progress = MockProgressStore::new();
        progress
            .expect_names_for_introduction()
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let mut transactor = MockTransactor::new();
        transactor.expect_fill_plan().never();

        let engine = PlanEngine::new(Arc::new(plan), Arc::new(progress), Arc::new(transactor));
        let tz = TimeZoneSpec::parse("UTC").unwrap();
        engine.ensure_today_plan("u1", &tz, 3, now()).await.unwrap();
    }
}
