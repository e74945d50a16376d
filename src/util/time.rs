//! Elapsed-time and date formatting helpers for the views

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::parse_timestamp;

const DAY: i64 = 24 * 3600;

/// Time passed between two instants, split into components
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ElapsedTime {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Whole time elapsed from `then` to `now`. An instant in the future gives zeros.
pub fn elapsed_time(then: DateTime<Utc>, now: DateTime<Utc>) -> ElapsedTime {
    let delta = (now - then).num_milliseconds().div_euclid(1000);

    ElapsedTime {
        days: (delta / DAY).max(0),
        hours: ((delta % DAY) / 3600).max(0),
        minutes: ((delta % 3600) / 60).max(0),
        seconds: (delta % 60).max(0),
    }
}

/// Time elapsed from `then` until now
pub fn elapsed_since(then: DateTime<Utc>) -> ElapsedTime {
    elapsed_time(then, Utc::now())
}

/// Long date used in order headers, e.g. `Sat, 02 August`
pub fn format_date_long(date: DateTime<Utc>) -> String {
    date.format("%a, %d %B").to_string()
}

/// [`format_date_long`] for a timestamp string. `None` when it does not parse.
pub fn format_date_long_str(date: &str) -> Option<String> {
    parse_timestamp(date).map(format_date_long)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_elapsed_time() {
        let then = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 8, 2, 13, 30, 30).unwrap();

        assert_eq!(
            elapsed_time(then, now),
            ElapsedTime {
                days: 1,
                hours: 1,
                minutes: 30,
                seconds: 30
            }
        );
    }

    #[test]
    fn test_elapsed_time_in_future_is_zero() {
        let then = Utc.with_ymd_and_hms(2025, 8, 2, 13, 30, 30).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();

        assert_eq!(elapsed_time(then, now), ElapsedTime::default());
    }

    #[test]
    fn test_partial_seconds_are_dropped() {
        let then = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
        let now = then + chrono::Duration::milliseconds(59_999);

        assert_eq!(elapsed_time(then, now).seconds, 59);
    }

    #[test]
    fn test_format_date_long() {
        let date = Utc.with_ymd_and_hms(2025, 8, 2, 13, 30, 30).unwrap();
        assert_eq!(format_date_long(date), "Sat, 02 August");
        assert_eq!(
            format_date_long_str("2025-08-02T13:30:30").as_deref(),
            Some("Sat, 02 August")
        );
        assert_eq!(format_date_long_str("not a date"), None);
    }
}
