//! Local-date resolution, next-hour truncation, and timezone parsing
//! (spec §4.3, §4.7, §6). `localMidnightToUTC` is the single conversion
//! helper; nothing else in the crate computes local dates directly.

use crate::domain::CoreError;
use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// A parsed timezone: either a DST-correct IANA zone or a DST-agnostic
/// fixed offset.
#[derive(Debug, Clone, Copy)]
pub enum TimeZoneSpec {
    Iana(Tz),
    Fixed(FixedOffset),
}

impl TimeZoneSpec {
    /// Accepts IANA names (`Europe/Moscow`), `UTC`/`GMT`, and signed
    /// offsets with optional minutes (`+3`, `-03:30`, `UTC+5:30`).
    /// Hours are limited to `[-14, +14]`, minutes to `[0,59]`.
    pub fn parse(raw: &str) -> crate::domain::Result<Self> {
        let s = raw.trim();
        if s.eq_ignore_ascii_case("utc") || s.eq_ignore_ascii_case("gmt") {
            return Ok(TimeZoneSpec::Fixed(FixedOffset::east_opt(0).unwrap()));
        }

        if let Some(offset) = parse_fixed_offset(s) {
            return offset.map(TimeZoneSpec::Fixed);
        }

        Tz::from_str(s)
            .map(TimeZoneSpec::Iana)
            .map_err(|_| CoreError::validation(format!("unrecognized timezone: {raw}")))
    }

    fn local_midnight_from_date(
        &self,
        year: i32,
        month: u32,
        day: u32,
    ) -> crate::domain::Result<DateTime<Utc>> {
        let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        match self {
            TimeZoneSpec::Fixed(offset) => {
                let naive_date = chrono::NaiveDate::from_ymd_opt(year, month, day)
                    .ok_or_else(|| CoreError::validation("invalid local date"))?;
                let local = offset
                    .from_local_datetime(&naive_date.and_time(midnight))
                    .single()
                    .ok_or_else(|| CoreError::validation("ambiguous local midnight"))?;
                Ok(local.with_timezone(&Utc))
            }
            TimeZoneSpec::Iana(tz) => {
                let naive_date = chrono::NaiveDate::from_ymd_opt(year, month, day)
                    .ok_or_else(|| CoreError::validation("invalid local date"))?;
                let local = tz
                    .from_local_datetime(&naive_date.and_time(midnight))
                    .single()
                    .ok_or_else(|| CoreError::validation("ambiguous local midnight (DST gap)"))?;
                Ok(local.with_timezone(&Utc))
            }
        }
    }

    /// The UTC instant corresponding to the start of `now`'s local
    /// calendar day in this timezone.
    pub fn local_midnight_to_utc(&self, now: DateTime<Utc>) -> crate::domain::Result<DateTime<Utc>> {
        let (y, m, d) = match self {
            TimeZoneSpec::Fixed(offset) => {
                let local = now.with_timezone(offset);
                (local.year(), local.month(), local.day())
            }
            TimeZoneSpec::Iana(tz) => {
                let local = now.with_timezone(tz);
                (local.year(), local.month(), local.day())
            }
        };
        self.local_midnight_from_date(y, m, d)
    }

    /// `now` converted into this zone's local wall-clock time.
    pub fn to_local_naive(&self, now: DateTime<Utc>) -> chrono::NaiveDateTime {
        match self {
            TimeZoneSpec::Fixed(offset) => now.with_timezone(offset).naive_local(),
            TimeZoneSpec::Iana(tz) => now.with_timezone(tz).naive_local(),
        }
    }

    /// Convert a local naive date+time in this zone back to UTC,
    /// resolving DST ambiguity by taking the earlier instant.
    pub fn local_naive_to_utc(&self, naive: chrono::NaiveDateTime) -> DateTime<Utc> {
        match self {
            TimeZoneSpec::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .unwrap_or_else(|| offset.from_utc_datetime(&naive))
                .with_timezone(&Utc),
            TimeZoneSpec::Iana(tz) => tz
                .from_local_datetime(&naive)
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(&naive))
                .with_timezone(&Utc),
        }
    }
}

/// Parses `UTC±HH[:MM]` / `±HH[:MM]` style fixed offsets. Returns `None`
/// if the string doesn't look like an offset at all (so the caller can
/// fall through to IANA parsing); returns `Some(Err(..))` if it looks
/// like an offset but is out of range or malformed.
fn parse_fixed_offset(s: &str) -> Option<crate::domain::Result<FixedOffset>> {
    let body = s.strip_prefix("UTC").or_else(|| s.strip_prefix("GMT")).unwrap_or(s);
    let mut chars = body.chars();
    let sign = match chars.next() {
        Some('+') => 1i32,
        Some('-') => -1i32,
        _ => return None,
    };
    let rest = &body[1..];
    let (hour_str, minute_str) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None => (rest, "0"),
    };

    let hours: i32 = match hour_str.parse() {
        Ok(h) => h,
        Err(_) => return Some(Err(CoreError::validation(format!("invalid offset: {s}")))),
    };
    let minutes: i32 = match minute_str.parse() {
        Ok(m) => m,
        Err(_) => return Some(Err(CoreError::validation(format!("invalid offset: {s}")))),
    };

    if !(0..=14).contains(&hours) || !(0..=59).contains(&minutes) || (hours == 14 && minutes != 0)
    {
        return Some(Err(CoreError::validation(format!(
            "offset out of range [-14:00, +14:00]: {s}"
        ))));
    }

    let total_seconds = sign * (hours * 3600 + minutes * 60);
    match FixedOffset::east_opt(total_seconds) {
        Some(offset) => Some(Ok(offset)),
        None => Some(Err(CoreError::validation(format!("invalid offset: {s}")))),
    }
}

/// Truncates `now` down to the start of the current UTC hour.
pub fn truncate_to_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    now.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    #[test]
    fn parses_utc() {
        let tz = TimeZoneSpec::parse("UTC").unwrap();
        assert!(matches!(tz, TimeZoneSpec::Fixed(o) if o.local_minus_utc() == 0));
    }

    #[test]
    fn parses_fixed_offset_with_minutes() {
        let tz = TimeZoneSpec::parse("UTC+5:30").unwrap();
        match tz {
            TimeZoneSpec::Fixed(o) => assert_eq!(o.local_minus_utc(), 5 * 3600 + 30 * 60),
            _ => panic!("expected fixed offset"),
        }
    }

    #[test]
    fn parses_negative_offset_without_prefix() {
        let tz = TimeZoneSpec::parse("-03:30").unwrap();
        match tz {
            TimeZoneSpec::Fixed(o) => assert_eq!(o.local_minus_utc(), -(3 * 3600 + 30 * 60)),
            _ => panic!("expected fixed offset"),
        }
    }

    #[test]
    fn rejects_out_of_range_offset() {
        assert!(TimeZoneSpec::parse("UTC+15").is_err());
    }

    #[test]
    fn parses_iana_zone() {
        let tz = TimeZoneSpec::parse("Europe/Moscow").unwrap();
        assert!(matches!(tz, TimeZoneSpec::Iana(_)));
    }

    #[test]
    fn local_midnight_is_a_fixed_point() {
        let tz = TimeZoneSpec::parse("UTC+3").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 5, 14, 30, 0).unwrap();
        let midnight = tz.local_midnight_to_utc(now).unwrap();
        let again = tz.local_midnight_to_utc(midnight).unwrap();
        assert_eq!(midnight, again);
    }

    #[test]
    fn truncate_to_hour_drops_minutes() {
        let now = Utc.with_ymd_and_hms(2026, 3, 5, 14, 37, 42).unwrap();
        let truncated = truncate_to_hour(now);
        assert_eq!(truncated, Utc.with_ymd_and_hms(2026, 3, 5, 14, 0, 0).unwrap());
    }
}
