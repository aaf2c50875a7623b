//! Budget and execution snapshot inputs to the variance analyzer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TechnicalValidation;

/// Planned figures for one site or contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// The site the budget belongs to.
    pub site_id: String,
    /// Total man-hours planned for the contract.
    pub planned_hours_total: Decimal,
    /// Average planned cost of one man-hour.
    pub avg_hourly_cost: Decimal,
    /// Total planned contract value.
    pub planned_value_total: Decimal,
    /// Contractual completion date, if one is set.
    #[serde(default)]
    pub planned_completion: Option<NaiveDate>,
}

/// Cumulative execution figures for a site as of a date.
///
/// # Example
///
/// ```
/// use bulletin_engine::models::ExecutionSnapshot;
///
/// let json = r#"{
///     "hours_executed": "1200",
///     "hours_planned_to_date": "1000",
///     "realized_hourly_cost": "52.00",
///     "cost_to_date": "62400.00",
///     "percent_complete": "40",
///     "elapsed_days": 20,
///     "as_of": "2026-03-20"
/// }"#;
/// let snapshot: ExecutionSnapshot = serde_json::from_str(json).unwrap();
/// assert!(snapshot.technical_validation.certified);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSnapshot {
    /// Man-hours executed so far.
    pub hours_executed: Decimal,
    /// Man-hours the plan expected by the snapshot date.
    pub hours_planned_to_date: Decimal,
    /// Realized average cost of one man-hour.
    pub realized_hourly_cost: Decimal,
    /// Cost incurred so far.
    pub cost_to_date: Decimal,
    /// Physical progress, 0 to 100.
    pub percent_complete: Decimal,
    /// Days elapsed since the work started.
    pub elapsed_days: u32,
    /// Date the figures were taken.
    pub as_of: NaiveDate,
    /// Externally supplied technical validation flags.
    #[serde(default)]
    pub technical_validation: TechnicalValidation,
}
