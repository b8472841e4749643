//! Hourly batched reminder fan-out (spec §4.7). The cron trigger
//! itself (`0 * * * *`) lives in `names-service`; this module only
//! implements `processHour` and the pure scheduling math around it.

use crate::clock::{truncate_to_hour, TimeZoneSpec};
use crate::domain::{CoreError, Item, ProgressStats, ReminderConfig, ReminderKind, Result};
use crate::ports::{
    Catalog, Notifier, PlanStore, ProgressStore, ReminderPayload, ReminderStore, SettingsStore,
    Transactor,
};
use crate::services::plan_engine::PlanEngine;
use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use rand::seq::SliceRandom;
use std::sync::Arc;
use tokio::sync::Semaphore;

const BATCH_SIZE: u32 = 100;
const MAX_CONCURRENT: usize = 10;
const FALLBACK_START: &str = "08:00:00";
const FALLBACK_END: &str = "20:00:00";

#[derive(Clone)]
pub struct ReminderScheduler {
    reminder_store: Arc<dyn ReminderStore>,
    progress_store: Arc<dyn ProgressStore>,
    plan_store: Arc<dyn PlanStore>,
    settings_store: Arc<dyn SettingsStore>,
    catalog: Arc<dyn Catalog>,
    notifier: Arc<dyn Notifier>,
    plan_engine: PlanEngine,
}

impl ReminderScheduler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reminder_store: Arc<dyn ReminderStore>,
        progress_store: Arc<dyn ProgressStore>,
        plan_store: Arc<dyn PlanStore>,
        settings_store: Arc<dyn SettingsStore>,
        catalog: Arc<dyn Catalog>,
        notifier: Arc<dyn Notifier>,
        transactor: Arc<dyn Transactor>,
    ) -> Self {
        let plan_engine = PlanEngine::new(plan_store.clone(), progress_store.clone(), transactor);
        Self {
            reminder_store,
            progress_store,
            plan_store,
            settings_store,
            catalog,
            notifier,
            plan_engine,
        }
    }

    /// Paginates over due reminders and dispatches each batch with up
    /// to [`MAX_CONCURRENT`] concurrent workers.
    pub async fn process_hour(&self, now: DateTime<Utc>) -> Result<u32> {
        let mut offset = 0u32;
        let mut dispatched = 0u32;

        loop {
            let batch = self
                .reminder_store
                .reminders_due(now, BATCH_SIZE, offset)
                .await?;
            if batch.is_empty() {
                break;
            }

            let batch_len = batch.len() as u32;
            let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT));
            let mut handles = Vec::with_capacity(batch.len());
            for reminder in batch {
                let permit = semaphore.clone().acquire_owned().await.expect("semaphore open");
                let scheduler = self.clone();
                handles.push(tokio::spawn(async move {
                    let sent = scheduler.dispatch_one(reminder, now).await;
                    drop(permit);
                    sent
                }));
            }
            for handle in handles {
                if handle.await.unwrap_or(false) {
                    dispatched += 1;
                }
            }

            offset += batch_len;
        }

        Ok(dispatched)
    }

    async fn dispatch_one(&self, reminder: ReminderConfig, now: DateTime<Utc>) -> bool {
        match self.try_dispatch_one(&reminder, now).await {
            Ok(sent) => sent,
            Err(err) => {
                tracing::error!(user_id = %reminder.user_id, error = %err, "reminder dispatch failed");
                false
            }
        }
    }

    async fn try_dispatch_one(&self, reminder: &ReminderConfig, now: DateTime<Utc>) -> Result<bool> {
        if !reminder.can_send_now(now) {
            return Ok(false);
        }

        let stats = self.progress_store.stats(&reminder.user_id, now).await?;
        let settings = self.settings_store.get_or_create(&reminder.user_id).await?;
        let tz = TimeZoneSpec::parse(&settings.timezone)?;

        let selection = self
            .select_name_for_reminder(&reminder.user_id, &tz, &stats, reminder.last_kind, now)
            .await?;

        let Some((item, kind)) = selection else {
            let next = truncate_to_hour(now) + Duration::hours(1);
            self.reminder_store.reschedule(&reminder.user_id, next).await?;
            return Ok(false);
        };

        self.notifier
            .send_reminder(
                &reminder.user_id,
                &reminder.user_id,
                ReminderPayload {
                    kind,
                    item,
                    stats,
                },
            )
            .await?;

        let next_send_at = reminder_next_send(
            reminder.interval_hours,
            &reminder.start_time,
            &reminder.end_time,
            &tz,
            now,
        )?;
        let next_last_kind = alternate(reminder.last_kind, kind);

        self.reminder_store
            .record_send(&reminder.user_id, now, next_send_at, next_last_kind)
            .await?;

        Ok(true)
    }

    async fn select_name_for_reminder(
        &self,
        user_id: &str,
        tz: &TimeZoneSpec,
        stats: &ProgressStats,
        last_kind: ReminderKind,
        now: DateTime<Utc>,
    ) -> Result<Option<(Item, ReminderKind)>> {
        let settings = self.settings_store.get_or_create(user_id).await?;
        let today_date_utc = self
            .plan_engine
            .ensure_today_plan(user_id, tz, settings.names_per_day, now)
            .await?;

        let review_candidate = if stats.due_today > 0 {
            self.progress_store
                .next_due_name(user_id, now)
                .await?
                .and_then(|n| self.catalog.by_number(n))
        } else {
            None
        };

        let planned = self.plan_store.names_for_date(user_id, today_date_utc).await?;
        let mut not_mastered = Vec::new();
        for number in &planned {
            let streak = self.progress_store.get_streak(user_id, *number).await?;
            if streak < crate::srs::MIN_STREAK_FOR_MASTERY {
                not_mastered.push(*number);
            }
        }
        let study_candidate = not_mastered
            .choose(&mut rand::thread_rng())
            .and_then(|n| self.catalog.by_number(*n));

        let mut new_candidate = None;
        for number in &planned {
            if self.progress_store.get(user_id, *number).await?.is_none() {
                new_candidate = self.catalog.by_number(*number);
                break;
            }
        }

        let preferred = if last_kind == ReminderKind::New {
            ReminderKind::Review
        } else {
            ReminderKind::New
        };

        let order: [ReminderKind; 3] = if preferred == ReminderKind::New {
            [ReminderKind::New, ReminderKind::Review, ReminderKind::Study]
        } else {
            [ReminderKind::Review, ReminderKind::New, ReminderKind::Study]
        };

        for kind in order {
            let candidate = match kind {
                ReminderKind::New => new_candidate.clone(),
                ReminderKind::Review => review_candidate.clone(),
                ReminderKind::Study => study_candidate.clone(),
            };
            if let Some(item) = candidate {
                return Ok(Some((item, kind)));
            }
        }

        Ok(None)
    }

    pub async fn snooze(&self, user_id: &str, now: DateTime<Utc>) -> Result<()> {
        let next = truncate_to_hour(now) + Duration::hours(1);
        self.reminder_store.snooze(user_id, next).await?;
        Ok(())
    }

    pub async fn disable(&self, user_id: &str) -> Result<()> {
        self.reminder_store.set_enabled(user_id, false).await?;
        Ok(())
    }

    pub async fn set_interval(&self, user_id: &str, interval_hours: u8, now: DateTime<Utc>) -> Result<ReminderConfig> {
        if !(1..=24).contains(&interval_hours) {
            return Err(CoreError::validation("interval_hours must be in [1,24]"));
        }
        let config = self.reminder_store.set_interval(user_id, interval_hours).await?;
        let settings = self.settings_store.get_or_create(user_id).await?;
        let tz = TimeZoneSpec::parse(&settings.timezone)?;
        let next = reminder_next_send(interval_hours, &config.start_time, &config.end_time, &tz, now)?;
        self.reminder_store.reschedule(user_id, next).await?;
        Ok(config)
    }

    pub async fn set_window(&self, user_id: &str, start_time: &str, end_time: &str, now: DateTime<Utc>) -> Result<ReminderConfig> {
        let config = self.reminder_store.set_window(user_id, start_time, end_time).await?;
        let settings = self.settings_store.get_or_create(user_id).await?;
        let tz = TimeZoneSpec::parse(&settings.timezone)?;
        let next = reminder_next_send(config.interval_hours, &config.start_time, &config.end_time, &tz, now)?;
        self.reminder_store.reschedule(user_id, next).await?;
        Ok(config)
    }
}

/// `alternate(prev, sent)`: `study` keeps `prev` (or `new` if empty);
/// `new`/`review` adopt the sent kind.
pub fn alternate(prev: ReminderKind, sent: ReminderKind) -> ReminderKind {
    match sent {
        ReminderKind::Study => prev,
        ReminderKind::New | ReminderKind::Review => sent,
    }
}

fn parse_time_of_day(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .map_err(|_| CoreError::validation(format!("invalid time-of-day: {raw}")))
}

/// `reminderNextSend` (spec §4.7). Converts `now` to `tz`, determines the
/// local daily window, and returns the next UTC instant at which a
/// reminder should fire.
pub fn reminder_next_send(
    interval_hours: u8,
    start_tod: &str,
    end_tod: &str,
    tz: &TimeZoneSpec,
    now_utc: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    let (start_tod, end_tod) = {
        let start = parse_time_of_day(start_tod)?;
        let end = parse_time_of_day(end_tod)?;
        if end <= start {
            (parse_time_of_day(FALLBACK_START)?, parse_time_of_day(FALLBACK_END)?)
        } else {
            (start, end)
        }
    };

    let local_now = tz.to_local_naive(now_utc);
    let local_date = local_now.date();
    let start_today = local_date.and_time(start_tod);
    let end_today = local_date.and_time(end_tod);

    if local_now < start_today {
        return Ok(tz.local_naive_to_utc(start_today));
    }

    if local_now >= end_today {
        let next_day = local_date.succ_opt().ok_or_else(|| CoreError::validation("date overflow"))?;
        return Ok(tz.local_naive_to_utc(next_day.and_time(start_tod)));
    }

    let elapsed = local_now.signed_duration_since(start_today);
    let interval = Duration::hours(interval_hours.max(1) as i64);
    let k = elapsed.num_seconds() / interval.num_seconds().max(1);
    let next = start_today + interval * ((k + 1) as i32);

    if next >= end_today {
        let next_day = local_date.succ_opt().ok_or_else(|| CoreError::validation("date overflow"))?;
        Ok(tz.local_naive_to_utc(next_day.and_time(start_tod)))
    } else {
        Ok(tz.local_naive_to_utc(next))
    }
}

/// Exposed for callers that only need the truncation helper (e.g. snooze).
pub fn next_hour_after(now: DateTime<Utc>) -> DateTime<Utc> {
    truncate_to_hour(now) + Duration::hours(1)
}

#[allow(dead_code)]
fn _assert_minute_zero(t: DateTime<Utc>) -> bool {
    t.minute() == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    #[test]
    fn reminder_next_send_before_window_returns_start() {
        let tz = TimeZoneSpec::parse("UTC+3").unwrap();
        // local 07:00 == UTC 04:00, window starts at local 08:00
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 4, 0, 0).unwrap();
        let next = reminder_next_send(2, "08:00:00", "20:00:00", &tz, now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 1, 5, 0, 0).unwrap());
    }

    #[test]
    fn reminder_next_send_mid_window_advances_to_next_interval_tick() {
        let tz = TimeZoneSpec::parse("UTC+3").unwrap();
        // local 08:30 == UTC 05:30, interval=2h => next tick at local 10:00 == UTC 07:00
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 5, 30, 0).unwrap();
        let next = reminder_next_send(2, "08:00:00", "20:00:00", &tz, now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn reminder_next_send_after_window_returns_next_day_start() {
        let tz = TimeZoneSpec::parse("UTC+3").unwrap();
        // local 21:30 == UTC 18:30
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 18, 30, 0).unwrap();
        let next = reminder_next_send(2, "08:00:00", "20:00:00", &tz, now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 2, 5, 0, 0).unwrap());
    }

    #[test]
    fn reminder_next_send_falls_back_when_window_is_invalid() {
        let tz = TimeZoneSpec::parse("UTC").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        let next = reminder_next_send(1, "20:00:00", "08:00:00", &tz, now).unwrap();
        assert!(next > now);
    }

    #[test]
    fn reminder_next_send_is_always_after_now_when_in_window() {
        let tz = TimeZoneSpec::parse("UTC").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let next = reminder_next_send(1, "08:00:00", "20:00:00", &tz, now).unwrap();
        assert!(next > now);
    }

    #[test]
    fn alternate_keeps_prev_on_study() {
        assert_eq!(alternate(ReminderKind::New, ReminderKind::Study), ReminderKind::New);
        assert_eq!(alternate(ReminderKind::Review, ReminderKind::Study), ReminderKind::Review);
    }

    #[test]
    fn alternate_adopts_new_or_review() {
        assert_eq!(alternate(ReminderKind::New, ReminderKind::Review), ReminderKind::Review);
        assert_eq!(alternate(ReminderKind::Review, ReminderKind::New), ReminderKind::New);
    }
}
