//! Daily report (RDO) models and the measurement period type.
//!
//! Daily reports are owned by an external collaborator and treated as
//! immutable snapshots identified by `(id, revision)`.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::shift::{ShiftEntry, clock_time};
use crate::error::{EngineError, EngineResult};

/// An inclusive range of dates covered by a bulletin.
///
/// # Example
///
/// ```
/// use bulletin_engine::models::MeasurementPeriod;
/// use chrono::NaiveDate;
///
/// let period = MeasurementPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
/// ).unwrap();
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeasurementPeriod {
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl MeasurementPeriod {
    /// Creates a period, rejecting an end date before the start date.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        let period = Self {
            start_date,
            end_date,
        };
        period.validate()?;
        Ok(period)
    }

    /// A period covering a single work date.
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start_date: date,
            end_date: date,
        }
    }

    /// Errors if the end date is before the start date.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::InvalidPeriod {
                start_date: self.start_date,
                end_date: self.end_date,
            });
        }
        Ok(())
    }

    /// Checks if a date falls within the period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// One worker on a daily report roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Reference to the employee in the registry.
    pub employee_ref: String,
    /// Clock time the worker started.
    #[serde(with = "clock_time")]
    pub shift_start: NaiveTime,
    /// Clock time the worker finished.
    #[serde(with = "clock_time")]
    pub shift_end: NaiveTime,
    /// The worker's role on site (e.g. "welder").
    #[serde(default)]
    pub role: String,
}

/// Equipment used on site during the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentEntry {
    /// Equipment name.
    pub name: String,
    /// Equipment category, used as a price list fallback.
    #[serde(default)]
    pub category: String,
    /// Hours the equipment was in use.
    pub hours_used: Decimal,
    /// Hourly rate recorded on the report, overriding the price list.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
}

/// Material consumed on site during the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialEntry {
    /// Material name.
    pub name: String,
    /// Material category, used as a price list fallback.
    #[serde(default)]
    pub category: String,
    /// Quantity consumed.
    pub quantity_used: Decimal,
    /// Unit of measure (e.g. "kg", "m").
    #[serde(default)]
    pub unit: String,
    /// Unit price recorded on the report, overriding the price list.
    #[serde(default)]
    pub unit_price: Option<Decimal>,
}

/// Technical validation flags captured with the report.
///
/// These feed the compliance alerts of the variance analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalValidation {
    /// Workers hold the certifications the activity requires.
    pub certified: bool,
    /// Measuring instruments are within calibration.
    pub calibrated: bool,
}

impl Default for TechnicalValidation {
    fn default() -> Self {
        Self {
            certified: true,
            calibrated: true,
        }
    }
}

/// A single day's site activity record.
///
/// # Example
///
/// ```
/// use bulletin_engine::models::DailyReport;
///
/// let json = r#"{
///     "id": "rdo-001",
///     "site_id": "site-a",
///     "date": "2026-03-10",
///     "roster": [
///         { "employee_ref": "emp_001", "shift_start": "07:00", "shift_end": "17:00", "role": "welder" }
///     ]
/// }"#;
/// let report: DailyReport = serde_json::from_str(json).unwrap();
/// assert_eq!(report.revision, 1);
/// assert_eq!(report.shift_entries().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    /// Unique identifier of the report.
    pub id: String,
    /// Revision number, bumped whenever the report is edited.
    #[serde(default = "initial_revision")]
    pub revision: u32,
    /// The site the report belongs to.
    pub site_id: String,
    /// The work date recorded.
    pub date: NaiveDate,
    /// Workers on site.
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
    /// Equipment used.
    #[serde(default)]
    pub equipment: Vec<EquipmentEntry>,
    /// Materials consumed.
    #[serde(default)]
    pub materials: Vec<MaterialEntry>,
    /// Technical validation flags.
    #[serde(default)]
    pub technical_validation: TechnicalValidation,
}

fn initial_revision() -> u32 {
    1
}

impl DailyReport {
    /// Converts the roster into classifier inputs for the report date.
    pub fn shift_entries(&self) -> Vec<ShiftEntry> {
        self.roster
            .iter()
            .map(|r| ShiftEntry {
                employee_ref: r.employee_ref.clone(),
                work_date: self.date,
                start: r.shift_start,
                end: r.shift_end,
            })
            .collect()
    }
}
