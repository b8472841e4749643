//! Pure SRS state transitions (spec §4.1). Nothing in this module
//! touches a clock source other than the `now` it's given, and nothing
//! here performs I/O — callers own persistence.

use crate::domain::{AnswerQuality, Phase, Progress};
use chrono::{DateTime, Duration, Utc};

pub const MIN_STREAK_FOR_LEARNING: u32 = 3;
pub const MIN_STREAK_FOR_MASTERY: u32 = 7;
pub const MIN_INTERVAL_FOR_MASTERY: u32 = 21;
pub const MAX_INTERVAL_DAYS: u32 = 180;
pub const INITIAL_EASE: f64 = 2.5;
pub const MAX_EASE: f64 = 2.5;
pub const MIN_EASE: f64 = 1.3;

/// `(progress, quality, now) -> progress'`. `Hard` is accepted but not
/// currently produced by any caller (spec §9 Open Question (a)); it's
/// treated the same as `Good` pending that decision.
pub fn update(mut progress: Progress, quality: AnswerQuality, now: DateTime<Utc>) -> Progress {
    progress.review_count += 1;
    progress.last_reviewed_at = Some(now);

    match quality {
        AnswerQuality::Fail => {
            progress.streak = 0;
            progress.ease = (progress.ease - 0.2).max(MIN_EASE);
            progress.interval_days = 0;
            progress.next_review_at = Some(now + Duration::minutes(10));
            if progress.phase == Phase::Mastered {
                progress.phase = Phase::Learning;
            }
        }
        AnswerQuality::Hard | AnswerQuality::Good => {
            progress.streak += 1;
            progress.correct_count += 1;
            progress.ease = (progress.ease + 0.01).min(MAX_EASE);
            progress.interval_days = interval_for(progress.ease, progress.streak).min(MAX_INTERVAL_DAYS);
            progress.next_review_at = Some(now + Duration::hours(progress.interval_days as i64 * 24));

            if progress.streak >= MIN_STREAK_FOR_MASTERY
                && progress.interval_days >= MIN_INTERVAL_FOR_MASTERY
            {
                progress.phase = Phase::Mastered;
            } else if progress.phase == Phase::New
                && (progress.streak >= MIN_STREAK_FOR_LEARNING || progress.review_count >= 2)
            {
                progress.phase = Phase::Learning;
            }
        }
    }

    progress
}

/// `streak≤0→0; 1→1; 2→3; 3→7; streak>3 → floor(7 * ease^(streak-3))`.
/// Deterministic, side-effect-free.
pub fn interval_for(ease: f64, streak: u32) -> u32 {
    match streak {
        0 => 0,
        1 => 1,
        2 => 3,
        3 => 7,
        n => {
            let exponent = (n - 3) as i32;
            let value = 7.0 * ease.powi(exponent);
            value.floor().max(0.0) as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn progress(now: DateTime<Utc>) -> Progress {
        Progress::new("user-1", 5, now)
    }

    #[test]
    fn good_increments_streak_and_ease() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let p = update(progress(now), AnswerQuality::Good, now);
        assert_eq!(p.streak, 1);
        assert_eq!(p.review_count, 1);
        assert_eq!(p.correct_count, 1);
        assert!((p.ease - (INITIAL_EASE + 0.01)).abs() < 1e-9);
        assert_eq!(p.interval_days, 1);
    }

    #[test]
    fn fail_resets_streak_and_drops_ease() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut p = progress(now);
        p.streak = 5;
        p.ease = 2.2;
        let p = update(p, AnswerQuality::Fail, now);
        assert_eq!(p.streak, 0);
        assert!((p.ease - 2.0).abs() < 1e-9);
        assert_eq!(p.interval_days, 0);
        assert_eq!(p.next_review_at, Some(now + Duration::minutes(10)));
    }

    #[test]
    fn fail_never_drops_ease_below_floor() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut p = progress(now);
        p.ease = MIN_EASE;
        let p = update(p, AnswerQuality::Fail, now);
        assert_eq!(p.ease, MIN_EASE);
    }

    #[test]
    fn good_then_fail_always_resets_streak_to_zero() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut p = progress(now);
        for _ in 0..4 {
            p = update(p, AnswerQuality::Good, now);
        }
        assert!(p.streak > 0);
        let ease_before = p.ease;
        let p = update(p, AnswerQuality::Fail, now);
        assert_eq!(p.streak, 0);
        assert!((p.ease - (ease_before - 0.2).max(MIN_EASE)).abs() < 1e-9);
    }

    #[test]
    fn seven_consecutive_good_answers_reach_mastery() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut p = progress(now);
        for _ in 0..7 {
            p = update(p, AnswerQuality::Good, now);
        }
        assert_eq!(p.streak, 7);
        assert!(p.interval_days >= MIN_INTERVAL_FOR_MASTERY);
        assert_eq!(p.phase, Phase::Mastered);
    }

    #[test]
    fn mastery_demotes_to_learning_on_fail() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut p = progress(now);
        for _ in 0..7 {
            p = update(p, AnswerQuality::Good, now);
        }
        assert_eq!(p.phase, Phase::Mastered);
        let p = update(p, AnswerQuality::Fail, now);
        assert_eq!(p.phase, Phase::Learning);
        assert_eq!(p.streak, 0);
        assert_eq!(p.interval_days, 0);
    }

    #[test]
    fn new_promotes_to_learning_after_two_reviews_regardless_of_streak() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut p = progress(now);
        p = update(p, AnswerQuality::Fail, now);
        assert_eq!(p.phase, Phase::New);
        p = update(p, AnswerQuality::Good, now);
        assert_eq!(p.review_count, 2);
        assert_eq!(p.phase, Phase::Learning);
    }

    #[test]
    fn interval_for_matches_spec_table() {
        assert_eq!(interval_for(2.5, 0), 0);
        assert_eq!(interval_for(2.5, 1), 1);
        assert_eq!(interval_for(2.5, 2), 3);
        assert_eq!(interval_for(2.5, 3), 7);
        assert_eq!(interval_for(2.5, 4), (7.0 * 2.5f64.powi(1)).floor() as u32);
    }

    #[test]
    fn interval_is_non_decreasing_over_a_run_of_good_answers() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut p = progress(now);
        let mut last = 0;
        for _ in 0..20 {
            p = update(p, AnswerQuality::Good, now);
            assert!(p.interval_days >= last);
            assert!(p.interval_days <= MAX_INTERVAL_DAYS);
            last = p.interval_days;
        }
    }
}
