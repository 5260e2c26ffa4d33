//! Keys stored in the `app_config` table and the values they accept.

use crate::calendar::HolidayCalendar;
use crate::error::{Error, Result};
use crate::window::Window;

/// Path of a holiday calendar JSON file replacing the bundled US one.
pub const HOLIDAYS_PATH: &str = "holidays_path";
/// Analysis window used when a command is not given `--window`.
pub const DEFAULT_WINDOW: &str = "default_window";
/// Page size for Asana list requests.
pub const PAGE_SIZE: &str = "page_size";

pub const KNOWN_KEYS: [(&str, &str); 3] = [
    (HOLIDAYS_PATH, "holiday calendar JSON file (default: bundled US holidays)"),
    (DEFAULT_WINDOW, "analysis window such as 90d, 12w, 6m or 1y (default: 90d)"),
    (PAGE_SIZE, "tasks per Asana API page, 1-100 (default: 100)"),
];

/// Check that `value` is acceptable for `key` before it is stored.
pub fn validate(key: &str, value: &str) -> Result<()> {
    match key {
        HOLIDAYS_PATH => HolidayCalendar::from_path(value).map(|_| ()),
        DEFAULT_WINDOW => Window::parse(value).map(|_| ()),
        PAGE_SIZE => match value.parse::<u32>() {
            Ok(n) if (1..=100).contains(&n) => Ok(()),
            _ => Err(Error::Config(format!("page_size must be 1-100, got '{value}'"))),
        },
        _ => {
            let known: Vec<&str> = KNOWN_KEYS.iter().map(|(k, _)| *k).collect();
            Err(Error::Config(format!(
                "unknown config key '{key}' (known: {})",
                known.join(", ")
            )))
        }
    }
}

/// The configured calendar, or the bundled one when no path is set.
pub fn load_calendar(holidays_path: Option<&str>) -> Result<HolidayCalendar> {
    match holidays_path {
        Some(path) => {
            log::debug!("Loading holiday calendar from {path}");
            HolidayCalendar::from_path(path)
        }
        None => HolidayCalendar::bundled(),
    }
}

/// The configured default window, falling back to 90 days.
pub fn default_window(value: Option<&str>) -> Result<Window> {
    value.map_or(Ok(Window::default()), Window::parse)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_validate_known_keys() {
        assert!(validate(DEFAULT_WINDOW, "12w").is_ok());
        assert!(validate(DEFAULT_WINDOW, "soon").is_err());
        assert!(validate(PAGE_SIZE, "50").is_ok());
        assert!(matches!(validate(PAGE_SIZE, "0"), Err(Error::Config(_))));
        assert!(matches!(validate(PAGE_SIZE, "500"), Err(Error::Config(_))));
        assert!(matches!(validate("workspace", "1"), Err(Error::Config(_))));
    }

    #[test]
    fn test_holidays_path_must_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"years": {{"2026": [{{"date": "2026-01-01", "name": "New Year's Day"}}]}}}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        assert!(validate(HOLIDAYS_PATH, path).is_ok());
        let calendar = load_calendar(Some(path)).unwrap();
        assert!(calendar.covers_year(2026));
        assert!(!calendar.covers_year(2025));

        assert!(matches!(
            validate(HOLIDAYS_PATH, "/nonexistent/holidays.json"),
            Err(Error::Calendar(_))
        ));
    }

    #[test]
    fn test_defaults() {
        assert!(load_calendar(None).unwrap().covers_year(2025));
        assert_eq!(default_window(None).unwrap().days(), 90);
        assert_eq!(default_window(Some("1y")).unwrap().days(), 365);
    }
}
