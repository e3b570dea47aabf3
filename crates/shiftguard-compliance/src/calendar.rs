//! Employee-local calendar-day boundaries.
//!
//! Break accounting works over calendar days in the employee's timezone.
//! Sessions that straddle local midnight are a known edge case: the engine
//! keeps the day-boundary approach and logs such sessions rather than
//! silently reinterpreting the window (see DESIGN.md).

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Parse an IANA timezone name, falling back to UTC.
///
/// A bad timezone string must not block enforcement; the fallback is logged
/// so the directory data can be fixed.
pub fn parse_timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        warn!(timezone = name, "Unknown timezone, falling back to UTC");
        Tz::UTC
    })
}

/// The local calendar date of `at` in `tz`.
pub fn local_date(tz: Tz, at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

/// The UTC half-open window `[start, end)` covering one local calendar day.
///
/// On DST transitions where local midnight does not exist or is ambiguous,
/// the earliest valid instant is used.
pub fn day_window(tz: Tz, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_midnight(tz, date);
    let end = local_midnight(tz, date + Duration::days(1));
    (start, end)
}

/// The UTC window of the local day containing `at`.
pub fn day_window_containing(tz: Tz, at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    day_window(tz, local_date(tz, at))
}

fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
    match tz.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // Midnight skipped by a DST jump; resolve via UTC and convert back.
        None => Utc
            .from_utc_datetime(&naive)
            .with_timezone(&tz)
            .with_timezone(&Utc),
    }
}

/// Whether an interval crosses a local midnight boundary.
pub fn crosses_local_midnight(tz: Tz, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    local_date(tz, start) != local_date(tz, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_known_timezone() {
        assert_eq!(parse_timezone("Europe/Berlin"), chrono_tz::Europe::Berlin);
    }

    #[test]
    fn test_parse_unknown_timezone_falls_back_to_utc() {
        assert_eq!(parse_timezone("Not/AZone"), Tz::UTC);
    }

    #[test]
    fn test_utc_day_window() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let (start, end) = day_window(Tz::UTC, date);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_berlin_day_window_is_offset_from_utc() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let (start, end) = day_window(chrono_tz::Europe::Berlin, date);
        // CEST is UTC+2 in June.
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 14, 22, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 6, 15, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_crosses_local_midnight() {
        let tz = Tz::UTC;
        let evening = Utc.with_ymd_and_hms(2025, 6, 15, 22, 0, 0).unwrap();
        let next_morning = Utc.with_ymd_and_hms(2025, 6, 16, 2, 0, 0).unwrap();
        let same_evening = Utc.with_ymd_and_hms(2025, 6, 15, 23, 30, 0).unwrap();
        assert!(crosses_local_midnight(tz, evening, next_morning));
        assert!(!crosses_local_midnight(tz, evening, same_evening));
    }
}
