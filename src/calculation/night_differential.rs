//! Night differential hour counting.
//!
//! The shift is stepped in whole one-hour increments from its start time.
//! An increment counts as a night hour when it fits completely inside the
//! shift and its starting clock hour is inside the night window. A trailing
//! increment shorter than an hour is not counted, so night hours never
//! exceed the whole hours worked.

use chrono::{Duration, Timelike};
use rust_decimal::Decimal;

use crate::config::NightWindow;
use crate::models::ShiftEntry;

/// Counts the night hours in a shift.
///
/// # Example
///
/// ```
/// use bulletin_engine::calculation::count_night_hours;
/// use bulletin_engine::config::NightWindow;
/// use bulletin_engine::models::ShiftEntry;
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let shift = ShiftEntry {
///     employee_ref: "emp_001".to_string(),
///     work_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
///     start: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
///     end: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
/// };
/// // 22:00 through 04:00 increments count, 05:00-06:00 does not
/// assert_eq!(count_night_hours(&shift, &NightWindow::default()), Decimal::from(7));
/// ```
pub fn count_night_hours(shift: &ShiftEntry, window: &NightWindow) -> Decimal {
    let start = shift.start_datetime();
    let end = shift.end_datetime();

    let mut count: i64 = 0;
    let mut cursor = start;
    while cursor + Duration::hours(1) <= end {
        if window.contains(cursor.hour()) {
            count += 1;
        }
        cursor += Duration::hours(1);
    }

    Decimal::from(count)
}
