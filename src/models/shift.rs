//! Shift entry model.
//!
//! This module defines [`ShiftEntry`], a single employee's attendance for one
//! work date, and the clock-time serde helpers shared with the daily report
//! models.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Serde helpers for wall-clock times.
///
/// Site reports record times as `HH:MM`. `HH:MM:SS` is accepted only with
/// zero seconds, since hours are measured at minute precision. Times are
/// always written back as `HH:MM`.
pub(crate) mod clock_time {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveTime, String> {
        let time = NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(|e| format!("invalid clock time '{}': {}", raw, e))?;
        if time.second() != 0 {
            return Err(format!(
                "invalid clock time '{}': seconds must be zero",
                raw
            ));
        }
        Ok(time)
    }
}

/// One employee's shift on a given work date.
///
/// Start and end are local clock times. An end time earlier than the start
/// time means the shift continues past midnight into the next calendar day.
///
/// # Example
///
/// ```
/// use bulletin_engine::models::ShiftEntry;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let entry = ShiftEntry {
///     employee_ref: "emp_001".to_string(),
///     work_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
///     start: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
///     end: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
/// };
/// assert!(entry.crosses_midnight());
/// assert_eq!(entry.duration_minutes(), 480);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftEntry {
    /// Reference to the employee who worked the shift.
    pub employee_ref: String,
    /// The date the shift started on.
    pub work_date: NaiveDate,
    /// Clock time the shift started.
    #[serde(with = "clock_time")]
    pub start: NaiveTime,
    /// Clock time the shift ended.
    #[serde(with = "clock_time")]
    pub end: NaiveTime,
}

impl ShiftEntry {
    /// Returns true if the end time is on the calendar day after the start.
    pub fn crosses_midnight(&self) -> bool {
        self.end < self.start
    }

    /// The datetime the shift started.
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.work_date.and_time(self.start)
    }

    /// The datetime the shift ended, with the overnight adjustment applied.
    pub fn end_datetime(&self) -> NaiveDateTime {
        let end = self.work_date.and_time(self.end);
        if self.crosses_midnight() {
            end + Duration::days(1)
        } else {
            end
        }
    }

    /// Worked minutes after the overnight adjustment.
    ///
    /// Zero when start and end are equal.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_datetime() - self.start_datetime()).num_minutes()
    }
}
