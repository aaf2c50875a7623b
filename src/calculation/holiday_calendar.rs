//! Holiday detection for the time classifier.
//!
//! Whether a work date is paid as holiday time is an injectable capability.
//! [`SundayCalendar`] checks the weekday only; [`ConfiguredCalendar`] adds a
//! list of dated holidays loaded from configuration.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashMap;

use crate::config::HolidayConfig;

/// Decides whether a work date is paid at the holiday rate.
pub trait HolidayCalendar: Send + Sync {
    /// Returns true if hours worked on `date` are holiday hours.
    fn is_holiday(&self, date: NaiveDate) -> bool;

    /// The holiday's name, if the date is a named holiday.
    fn holiday_name(&self, _date: NaiveDate) -> Option<&str> {
        None
    }
}

/// Treats every Sunday as a holiday and nothing else.
///
/// # Example
///
/// ```
/// use bulletin_engine::calculation::{HolidayCalendar, SundayCalendar};
/// use chrono::NaiveDate;
///
/// // 2026-03-15 is a Sunday, 2026-03-14 a Saturday
/// assert!(SundayCalendar.is_holiday(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()));
/// assert!(!SundayCalendar.is_holiday(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SundayCalendar;

impl HolidayCalendar for SundayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        date.weekday() == Weekday::Sun
    }
}

/// A calendar of dated holidays, optionally including every Sunday.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredCalendar {
    sundays_are_holidays: bool,
    holidays: HashMap<NaiveDate, String>,
}

impl ConfiguredCalendar {
    /// Creates a calendar from explicit parts.
    pub fn new(
        sundays_are_holidays: bool,
        holidays: impl IntoIterator<Item = (NaiveDate, String)>,
    ) -> Self {
        Self {
            sundays_are_holidays,
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Creates a calendar from the holidays configuration section.
    pub fn from_config(config: &HolidayConfig) -> Self {
        Self::new(
            config.sundays_are_holidays,
            config.holidays.iter().map(|h| (h.date, h.name.clone())),
        )
    }

    /// Number of dated holidays.
    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    /// Returns true if no dated holidays are configured.
    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }
}

impl HolidayCalendar for ConfiguredCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        (self.sundays_are_holidays && date.weekday() == Weekday::Sun)
            || self.holidays.contains_key(&date)
    }

    fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&date).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn test_sunday_calendar_only_sundays() {
        // 2026-03-09 is a Monday
        for offset in 0..6 {
            assert!(!SundayCalendar.is_holiday(date(3, 9 + offset)));
        }
        assert!(SundayCalendar.is_holiday(date(3, 15)));
        assert_eq!(SundayCalendar.holiday_name(date(3, 15)), None);
    }

    #[test]
    fn test_configured_calendar_dated_holiday() {
        let calendar =
            ConfiguredCalendar::new(true, vec![(date(4, 21), "Tiradentes".to_string())]);

        assert!(calendar.is_holiday(date(4, 21)));
        assert_eq!(calendar.holiday_name(date(4, 21)), Some("Tiradentes"));
        assert!(calendar.is_holiday(date(3, 15)));
        assert!(!calendar.is_holiday(date(3, 10)));
        assert_eq!(calendar.len(), 1);
    }

    #[test]
    fn test_configured_calendar_without_sundays() {
        let calendar = ConfiguredCalendar::new(false, Vec::new());
        assert!(!calendar.is_holiday(date(3, 15)));
        assert!(calendar.is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = HolidayConfig {
            sundays_are_holidays: false,
            holidays: vec![crate::config::Holiday {
                date: date(12, 25),
                name: "Christmas Day".to_string(),
            }],
        };
        let calendar = ConfiguredCalendar::from_config(&config);
        assert!(calendar.is_holiday(date(12, 25)));
        assert!(!calendar.is_holiday(date(3, 15)));
    }
}
