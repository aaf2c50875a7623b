//! Time classification for a single shift.
//!
//! This module turns a shift entry and the employee's pay profile into the
//! [`ClassifiedHours`] buckets priced by the bulletin aggregator.
//!
//! ## Rules
//!
//! - Holiday or Sunday (per the injected calendar): every hour is a holiday
//!   hour and every other bucket, night included, is zero.
//! - Otherwise hours split into normal, tier-1 and tier-2 overtime via
//!   [`split_overtime`], and night hours are counted on top.

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;

use crate::config::NightWindow;
use crate::error::{EngineError, EngineResult};
use crate::models::{ClassifiedHours, EmployeePayProfile, ShiftEntry};

use super::holiday_calendar::HolidayCalendar;
use super::night_differential::count_night_hours;
use super::overtime::split_overtime;

const MINUTES_PER_HOUR: i64 = 60;
const MAX_SHIFT_MINUTES: i64 = 24 * MINUTES_PER_HOUR;

/// Classifies one shift into pay buckets.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRange`] when a clock time carries seconds,
/// when the shift has no length after the overnight adjustment, or when it
/// lasts longer than 24 hours.
///
/// # Examples
///
/// ## Twelve-hour Tuesday shift
///
/// ```
/// use bulletin_engine::calculation::{classify_shift, SundayCalendar};
/// use bulletin_engine::config::NightWindow;
/// use bulletin_engine::models::{EmployeePayProfile, ShiftEntry};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let profile = EmployeePayProfile::with_rate("emp_001", Decimal::from(40));
/// let shift = ShiftEntry {
///     employee_ref: "emp_001".to_string(),
///     work_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(), // Tuesday
///     start: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
///     end: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
/// };
///
/// let hours = classify_shift(&profile, &shift, &SundayCalendar, &NightWindow::default()).unwrap();
/// assert_eq!(hours.normal_hours, Decimal::from(8));
/// assert_eq!(hours.overtime_tier1_hours, Decimal::from(2));
/// assert_eq!(hours.overtime_tier2_hours, Decimal::from(2));
/// ```
pub fn classify_shift(
    profile: &EmployeePayProfile,
    shift: &ShiftEntry,
    calendar: &dyn HolidayCalendar,
    night_window: &NightWindow,
) -> EngineResult<ClassifiedHours> {
    if !is_whole_minute(shift.start) || !is_whole_minute(shift.end) {
        return Err(invalid_range(shift, "clock times must be whole minutes"));
    }
    let minutes = shift.duration_minutes();
    if minutes <= 0 {
        return Err(invalid_range(shift, "shift end must be after shift start"));
    }
    if minutes > MAX_SHIFT_MINUTES {
        return Err(invalid_range(shift, "shift exceeds 24 hours"));
    }

    let total_hours = Decimal::from(minutes) / Decimal::from(MINUTES_PER_HOUR);

    if calendar.is_holiday(shift.work_date) {
        return Ok(ClassifiedHours {
            employee_ref: shift.employee_ref.clone(),
            total_hours,
            normal_hours: Decimal::ZERO,
            overtime_tier1_hours: Decimal::ZERO,
            overtime_tier2_hours: Decimal::ZERO,
            night_hours: Decimal::ZERO,
            holiday_hours: total_hours,
            is_holiday: true,
        });
    }

    let split = split_overtime(total_hours, profile.normal_shift_hours);
    let night_hours = count_night_hours(shift, night_window);

    Ok(ClassifiedHours {
        employee_ref: shift.employee_ref.clone(),
        total_hours,
        normal_hours: split.normal_hours,
        overtime_tier1_hours: split.tier1_hours,
        overtime_tier2_hours: split.tier2_hours,
        night_hours,
        holiday_hours: Decimal::ZERO,
        is_holiday: false,
    })
}

fn is_whole_minute(time: NaiveTime) -> bool {
    time.second() == 0 && time.nanosecond() == 0
}

fn invalid_range(shift: &ShiftEntry, message: &str) -> EngineError {
    EngineError::InvalidRange {
        employee_ref: shift.employee_ref.clone(),
        date: shift.work_date,
        start: shift.start,
        end: shift.end,
        message: message.to_string(),
    }
}
