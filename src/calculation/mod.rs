//! Calculation logic for the bulletin engine.
//!
//! This module contains the pure calculation functions: holiday detection,
//! overtime splitting, night differential counting, shift classification,
//! monetary valuation of hours, equipment and materials, and budget variance
//! analysis.

mod holiday_calendar;
mod night_differential;
mod overtime;
mod time_classifier;
mod valuation;
mod variance;

pub use holiday_calendar::{ConfiguredCalendar, HolidayCalendar, SundayCalendar};
pub use night_differential::count_night_hours;
pub use overtime::{OvertimeSplit, TIER1_OVERTIME_CAP, split_overtime};
pub use time_classifier::classify_shift;
pub use valuation::{LaborValue, price_equipment, price_material, value_hours};
pub use variance::compute_variance;
