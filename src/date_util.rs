use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Parse an Asana-style timestamp into local wall-clock time.
///
/// Accepts RFC 3339 (`2025-01-06T14:00:00.000Z`, converted to the local
/// time zone), naive ISO date-times (`2025-01-06T09:00:00`, taken as local)
/// and bare dates (`2025-01-06`, local midnight). Anything else is `None`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(start_of_day)
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Fractional calendar days from `from` to `to` (negative if `to` is earlier).
pub fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Fractional hours from `from` to `to`.
pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// First day of the month containing `date`.
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// The same instant `months` calendar months earlier, clamped to month end.
pub fn months_before(at: NaiveDateTime, months: u32) -> NaiveDateTime {
    at.checked_sub_months(Months::new(months)).unwrap_or(at)
}

/// Short chart label, e.g. `Jan 6`.
pub fn chart_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_parse_naive_timestamp() {
        assert_eq!(parse_timestamp("2025-01-06T09:00:00"), Some(dt("2025-01-06T09:00:00")));
        assert_eq!(
            parse_timestamp("2025-01-06T09:00:00.250"),
            Some(dt("2025-01-06T09:00:00") + Duration::milliseconds(250))
        );
        assert_eq!(parse_timestamp("2025-01-06 09:00:00"), Some(dt("2025-01-06T09:00:00")));
    }

    #[test]
    fn test_parse_date_only() {
        assert_eq!(parse_timestamp("2025-01-06"), Some(dt("2025-01-06T00:00:00")));
    }

    #[test]
    fn test_parse_rfc3339_converts_to_local() {
        let parsed = parse_timestamp("2025-01-06T14:00:00.000Z").unwrap();
        let expected = DateTime::parse_from_rfc3339("2025-01-06T14:00:00Z")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2025-13-45"), None);
    }

    #[test]
    fn test_days_and_hours_between() {
        let a = dt("2025-01-06T00:00:00");
        let b = dt("2025-01-07T12:00:00");
        assert_eq!(days_between(a, b), 1.5);
        assert_eq!(hours_between(a, b), 36.0);
        assert_eq!(days_between(b, a), -1.5);
    }

    #[test]
    fn test_week_start() {
        let sunday = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        let monday = week_start(sunday);
        assert_eq!(monday, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn test_first_day_of_month() {
        assert_eq!(
            first_day_of_month(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
        );
    }

    #[test]
    fn test_months_before_clamps() {
        assert_eq!(months_before(dt("2025-03-31T10:00:00"), 1), dt("2025-02-28T10:00:00"));
        assert_eq!(months_before(dt("2025-10-19T10:00:00"), 12), dt("2024-10-19T10:00:00"));
    }

    #[test]
    fn test_chart_label() {
        assert_eq!(chart_label(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()), "Jan 6");
        assert_eq!(chart_label(NaiveDate::from_ymd_opt(2025, 11, 27).unwrap()), "Nov 27");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.345_6), 2.35);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(10.0 / 3.0), 3.33);
    }
}
