use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;

use crate::error::{Error, Result};

const BUNDLED_US: &str = include_str!("../../data/holidays_us.json");

/// Non-business dates: weekends plus a per-year list of holidays.
///
/// Years with no entry in the calendar have no holidays, so only weekends
/// are excluded for them. Use [`HolidayCalendar::covers_year`] to detect
/// that case.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    region: Option<String>,
    years: BTreeMap<i32, BTreeMap<NaiveDate, String>>,
}

#[derive(Debug, Deserialize)]
struct CalendarFile {
    #[serde(default)]
    region: Option<String>,
    years: BTreeMap<String, Vec<HolidayEntry>>,
}

#[derive(Debug, Deserialize)]
struct HolidayEntry {
    date: NaiveDate,
    #[serde(default)]
    name: String,
}

impl HolidayCalendar {
    /// A calendar with no holidays at all.
    pub fn weekends_only() -> Self {
        Self::default()
    }

    /// The US holiday list shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_US)
    }

    /// Load a calendar from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Calendar(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Parse a calendar document:
    ///
    /// ```json
    /// { "region": "US", "years": { "2025": [{ "date": "2025-01-01", "name": "New Year's Day" }] } }
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        let file: CalendarFile =
            serde_json::from_str(text).map_err(|e| Error::Calendar(e.to_string()))?;

        let mut years = BTreeMap::new();
        for (key, entries) in file.years {
            let year: i32 = key
                .trim()
                .parse()
                .map_err(|_| Error::Calendar(format!("invalid year key: {key}")))?;
            let mut days = BTreeMap::new();
            for entry in entries {
                if entry.date.year() != year {
                    return Err(Error::Calendar(format!(
                        "holiday {} listed under year {year}",
                        entry.date
                    )));
                }
                days.insert(entry.date, entry.name);
            }
            years.insert(year, days);
        }

        Ok(Self {
            region: file.region,
            years,
        })
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_name(date).is_some()
    }

    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.years
            .get(&date.year())
            .and_then(|days| days.get(&date))
            .map(|name| name.as_str())
    }

    /// Monday through Friday, and not a listed holiday.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !Self::is_weekend(date) && !self.is_holiday(date)
    }

    /// Whether the calendar has a holiday list for `year`.
    pub fn covers_year(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    /// Years between `from` and `to` (inclusive) with no holiday list.
    pub fn uncovered_years(&self, from: NaiveDate, to: NaiveDate) -> Vec<i32> {
        if to < from {
            return Vec::new();
        }
        (from.year()..=to.year())
            .filter(|y| !self.covers_year(*y))
            .collect()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    /// Number of holidays listed across all years.
    pub fn len(&self) -> usize {
        self.years.values().map(|d| d.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
