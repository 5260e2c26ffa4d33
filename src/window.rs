use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static RE_WINDOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,4})\s*([dwmyDWMY])$").unwrap());

/// A trailing analysis window such as `90d`, `12w`, `6m` or `1y`.
///
/// Months count as 30 days and years as 365, matching how the savings
/// projections extrapolate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
}

impl Window {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let caps = RE_WINDOW
            .captures(s)
            .ok_or_else(|| Error::WindowParse(format!("unrecognized window: {s}")))?;
        let n: u32 = caps[1]
            .parse()
            .map_err(|_| Error::WindowParse(format!("invalid count: {s}")))?;
        if n == 0 {
            return Err(Error::WindowParse(format!("window must be positive: {s}")));
        }
        let window = match caps[2].to_ascii_lowercase().as_str() {
            "d" => Window::Days(n),
            "w" => Window::Weeks(n),
            "m" => Window::Months(n),
            _ => Window::Years(n),
        };
        Ok(window)
    }

    pub fn days(self) -> u32 {
        match self {
            Window::Days(n) => n,
            Window::Weeks(n) => n * 7,
            Window::Months(n) => n * 30,
            Window::Years(n) => n * 365,
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Window::Days(crate::analytics::DEFAULT_WINDOW_DAYS)
    }
}

impl FromStr for Window {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Window::parse(s)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Days(n) => write!(f, "{n}d"),
            Window::Weeks(n) => write!(f, "{n}w"),
            Window::Months(n) => write!(f, "{n}m"),
            Window::Years(n) => write!(f, "{n}y"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(Window::parse("90d").unwrap(), Window::Days(90));
        assert_eq!(Window::parse("12w").unwrap(), Window::Weeks(12));
        assert_eq!(Window::parse(" 6M ").unwrap(), Window::Months(6));
        assert_eq!(Window::parse("1y").unwrap(), Window::Years(1));
    }

    #[test]
    fn test_days() {
        assert_eq!(Window::Days(90).days(), 90);
        assert_eq!(Window::Weeks(12).days(), 84);
        assert_eq!(Window::Months(6).days(), 180);
        assert_eq!(Window::Years(1).days(), 365);
        assert_eq!(Window::default().days(), 90);
    }

    #[test]
    fn test_rejects_bad_input() {
        for bad in ["", "d", "0d", "90", "90x", "-5d", "2025-Q1"] {
            assert!(
                matches!(Window::parse(bad), Err(Error::WindowParse(_))),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn test_display_round_trips() {
        let w: Window = "12w".parse().unwrap();
        assert_eq!(w.to_string(), "12w");
    }
}
