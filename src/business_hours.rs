use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::calendar::HolidayCalendar;
use crate::date_util::{hours_between, parse_timestamp};

pub const BUSINESS_HOURS_START: u32 = 8;
pub const BUSINESS_HOURS_END: u32 = 17;

/// A daily working window (local time) applied on business days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
}

impl Default for BusinessHours {
    /// 08:00 to 17:00.
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(BUSINESS_HOURS_START, 0, 0).unwrap_or_default(),
            day_end: NaiveTime::from_hms_opt(BUSINESS_HOURS_END, 0, 0).unwrap_or_default(),
        }
    }
}

impl BusinessHours {
    /// Window from `start_hour`:00 to `end_hour`:00. `None` if the hours are
    /// out of range or the window is empty.
    pub fn new(start_hour: u32, end_hour: u32) -> Option<Self> {
        let day_start = NaiveTime::from_hms_opt(start_hour, 0, 0)?;
        let day_end = NaiveTime::from_hms_opt(end_hour, 0, 0)?;
        (day_start < day_end).then_some(Self { day_start, day_end })
    }

    /// Length of one full business day in hours.
    pub fn hours_per_day(&self) -> f64 {
        (self.day_end - self.day_start).num_minutes() as f64 / 60.0
    }

    /// Working hours between `start` and `end`: only time inside the daily
    /// window on days the calendar treats as business days counts.
    /// Returns `0.0` when `end <= start`.
    pub fn between(
        &self,
        calendar: &HolidayCalendar,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> f64 {
        if end <= start {
            return 0.0;
        }

        let mut total = 0.0;
        let mut day = start.date();
        let last = end.date();
        while day <= last {
            if calendar.is_business_day(day) {
                let window_start = day.and_time(self.day_start).max(start);
                let window_end = day.and_time(self.day_end).min(end);
                if window_start < window_end {
                    total += hours_between(window_start, window_end);
                }
            }
            day += Duration::days(1);
        }
        total
    }

    /// String form of [`BusinessHours::between`]. `None` if either timestamp
    /// fails to parse.
    pub fn between_str(&self, calendar: &HolidayCalendar, start: &str, end: &str) -> Option<f64> {
        let start = parse_timestamp(start)?;
        let end = parse_timestamp(end)?;
        Some(self.between(calendar, start, end))
    }
}

/// Business hours between two timestamps using the default 08:00–17:00
/// window.
pub fn calculate_business_hours(calendar: &HolidayCalendar, start: &str, end: &str) -> Option<f64> {
    BusinessHours::default().between_str(calendar, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cal() -> HolidayCalendar {
        HolidayCalendar::bundled().unwrap()
    }

    fn hours(start: &str, end: &str) -> Option<f64> {
        calculate_business_hours(&cal(), start, end)
    }

    #[test]
    fn test_same_day_inside_window() {
        // Monday
        assert_eq!(hours("2025-01-06T09:00:00", "2025-01-06T11:30:00"), Some(2.5));
        assert_eq!(hours("2025-01-06T08:00:00", "2025-01-06T17:00:00"), Some(9.0));
    }

    #[test]
    fn test_friday_to_monday() {
        assert_eq!(hours("2025-01-03T16:00:00", "2025-01-06T09:00:00"), Some(2.0));
        // 1 hour Friday, nothing over the weekend, nothing Monday before 08:00
        assert_eq!(hours("2025-01-03T16:00:00", "2025-01-06T08:00:00"), Some(1.0));
    }

    #[test]
    fn test_full_weekend_is_zero() {
        assert_eq!(hours("2025-01-03T17:00:00", "2025-01-06T08:00:00"), Some(0.0));
    }

    #[test]
    fn test_end_before_or_equal_start_is_zero() {
        assert_eq!(hours("2025-01-06T11:00:00", "2025-01-06T09:00:00"), Some(0.0));
        assert_eq!(hours("2025-01-06T11:00:00", "2025-01-06T11:00:00"), Some(0.0));
        assert_eq!(hours("2025-02-01T11:00:00", "2025-01-06T09:00:00"), Some(0.0));
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(hours("garbage", "2025-01-06T09:00:00"), None);
        assert_eq!(hours("2025-01-06T09:00:00", ""), None);
    }

    #[test]
    fn test_clips_outside_window() {
        // 06:00 -> 20:00 on a Monday counts the full 9 hours
        assert_eq!(hours("2025-01-06T06:00:00", "2025-01-06T20:00:00"), Some(9.0));
        // Started after hours, answered next morning at 10:15
        assert_eq!(hours("2025-01-06T18:30:00", "2025-01-07T10:15:00"), Some(2.25));
    }

    #[test]
    fn test_skips_holidays() {
        // Dec 24 (Wed) 16:00 -> Dec 26 (Fri) 09:00, Dec 25 is a holiday
        assert_eq!(hours("2025-12-24T16:00:00", "2025-12-26T09:00:00"), Some(2.0));
        // Entirely inside New Year's Day
        assert_eq!(hours("2025-01-01T09:00:00", "2025-01-01T15:00:00"), Some(0.0));
    }

    #[test]
    fn test_multi_week_span() {
        // Mon Jan 6 08:00 -> Mon Jan 13 08:00: five full business days
        assert_eq!(hours("2025-01-06T08:00:00", "2025-01-13T08:00:00"), Some(45.0));
    }

    #[test]
    fn test_weekends_only_calendar_counts_holidays() {
        let bh = BusinessHours::default();
        let start = parse_timestamp("2025-01-01T09:00:00").unwrap();
        let end = parse_timestamp("2025-01-01T15:00:00").unwrap();
        assert_eq!(bh.between(&HolidayCalendar::weekends_only(), start, end), 6.0);
    }

    #[test]
    fn test_custom_window() {
        let bh = BusinessHours::new(9, 17).unwrap();
        assert_eq!(bh.hours_per_day(), 8.0);
        assert_eq!(
            bh.between_str(&cal(), "2025-01-06T08:00:00", "2025-01-06T12:00:00"),
            Some(3.0)
        );
        assert!(BusinessHours::new(17, 8).is_none());
        assert!(BusinessHours::new(8, 25).is_none());
        assert_eq!(BusinessHours::default().hours_per_day(), 9.0);
    }
}
