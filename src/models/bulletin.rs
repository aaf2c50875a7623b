//! Measurement bulletin models.
//!
//! This module contains the [`Bulletin`] type and the line items and summary
//! it carries. A bulletin's line items are immutable once created; only the
//! status block changes, and only through the approval workflow.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{ClassifiedHours, MeasurementPeriod, PayCategory};
use crate::error::{EngineError, EngineResult};

/// Lifecycle status of a bulletin.
///
/// The only legal transitions are:
/// - Draft → Approved (approve)
/// - Approved → Invoiced (invoice)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletinStatus {
    /// Generated, awaiting approval.
    Draft,
    /// Approved by a site manager.
    Approved,
    /// Billed by the external invoicing collaborator. Terminal.
    Invoiced,
}

impl BulletinStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Invoiced => "invoiced",
        }
    }

    /// Returns true if moving from this status to `target` is legal.
    ///
    /// ```
    /// use bulletin_engine::models::BulletinStatus;
    ///
    /// assert!(BulletinStatus::Draft.can_transition_to(BulletinStatus::Approved));
    /// assert!(!BulletinStatus::Draft.can_transition_to(BulletinStatus::Invoiced));
    /// assert!(!BulletinStatus::Approved.can_transition_to(BulletinStatus::Draft));
    /// ```
    pub fn can_transition_to(&self, target: BulletinStatus) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Approved) | (Self::Approved, Self::Invoiced)
        )
    }
}

impl fmt::Display for BulletinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Approval stamp recorded when a bulletin leaves draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    /// Identity of the approver.
    pub approved_by: String,
    /// When the approval was recorded.
    pub approved_at: DateTime<Utc>,
}

/// Invoice stamp recorded by the billing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceStamp {
    /// Reference of the invoice in the billing system.
    pub invoice_ref: String,
    /// When the bulletin was invoiced.
    pub invoiced_at: DateTime<Utc>,
}

/// A daily report a bulletin was generated from, pinned to its revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceReportRef {
    /// The report identifier.
    pub report_id: String,
    /// The revision that was read.
    pub revision: u32,
}

/// Priced labor for one roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeLine {
    /// The report the entry came from.
    pub report_id: String,
    /// The work date of the shift.
    pub work_date: NaiveDate,
    /// The worker's role on site.
    pub role: String,
    /// The classified hours.
    pub hours: ClassifiedHours,
    /// The base hourly rate applied.
    pub hourly_rate: Decimal,
    /// Value of normal hours.
    pub normal_value: Decimal,
    /// Value of tier-1 overtime.
    pub tier1_value: Decimal,
    /// Value of tier-2 overtime.
    pub tier2_value: Decimal,
    /// Value of the night differential.
    pub night_value: Decimal,
    /// Value of holiday hours.
    pub holiday_value: Decimal,
    /// Sum of all category values.
    pub total: Decimal,
}

/// Priced equipment usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentLine {
    /// The report the entry came from.
    pub report_id: String,
    /// Equipment name.
    pub name: String,
    /// Equipment category.
    pub category: String,
    /// Hours in use.
    pub hours_used: Decimal,
    /// Hourly rate applied.
    pub hourly_rate: Decimal,
    /// `hours_used * hourly_rate`.
    pub total: Decimal,
}

/// Priced material consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialLine {
    /// The report the entry came from.
    pub report_id: String,
    /// Material name.
    pub name: String,
    /// Material category.
    pub category: String,
    /// Quantity consumed.
    pub quantity: Decimal,
    /// Unit of measure.
    pub unit: String,
    /// Unit price applied.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub total: Decimal,
}

/// Aggregated totals for a bulletin.
///
/// `grand_total` is always `employee_total + equipment_total + material_total`,
/// each of which is the exact sum of the corresponding line totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Total hours across all employee lines.
    pub total_hours: Decimal,
    /// Normal hours across all employee lines.
    pub normal_hours: Decimal,
    /// Tier-1 overtime hours.
    pub overtime_tier1_hours: Decimal,
    /// Tier-2 overtime hours.
    pub overtime_tier2_hours: Decimal,
    /// Night hours.
    pub night_hours: Decimal,
    /// Holiday hours.
    pub holiday_hours: Decimal,
    /// Value of normal hours.
    pub normal_value: Decimal,
    /// Value of tier-1 overtime.
    pub tier1_value: Decimal,
    /// Value of tier-2 overtime.
    pub tier2_value: Decimal,
    /// Value of the night differential.
    pub night_value: Decimal,
    /// Value of holiday hours.
    pub holiday_value: Decimal,
    /// Sum of employee line totals.
    pub employee_total: Decimal,
    /// Sum of equipment line totals.
    pub equipment_total: Decimal,
    /// Sum of material line totals.
    pub material_total: Decimal,
    /// Employee, equipment and material totals combined.
    pub grand_total: Decimal,
}

impl FinancialSummary {
    /// Builds a summary from priced line items.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AmountOverflow`] if a running total leaves the
    /// decimal range.
    pub fn from_lines(
        employees: &[EmployeeLine],
        equipment: &[EquipmentLine],
        materials: &[MaterialLine],
    ) -> EngineResult<Self> {
        let mut summary = Self::default();

        for line in employees {
            let hours = &line.hours;
            accumulate(&mut summary.total_hours, hours.total_hours, "total hours")?;
            accumulate(
                &mut summary.normal_hours,
                hours.hours_in(PayCategory::Normal),
                "normal hours",
            )?;
            accumulate(
                &mut summary.overtime_tier1_hours,
                hours.hours_in(PayCategory::OvertimeTier1),
                "tier-1 overtime hours",
            )?;
            accumulate(
                &mut summary.overtime_tier2_hours,
                hours.hours_in(PayCategory::OvertimeTier2),
                "tier-2 overtime hours",
            )?;
            accumulate(
                &mut summary.night_hours,
                hours.hours_in(PayCategory::Night),
                "night hours",
            )?;
            accumulate(
                &mut summary.holiday_hours,
                hours.hours_in(PayCategory::Holiday),
                "holiday hours",
            )?;

            accumulate(&mut summary.normal_value, line.normal_value, "normal value")?;
            accumulate(&mut summary.tier1_value, line.tier1_value, "tier-1 value")?;
            accumulate(&mut summary.tier2_value, line.tier2_value, "tier-2 value")?;
            accumulate(&mut summary.night_value, line.night_value, "night value")?;
            accumulate(&mut summary.holiday_value, line.holiday_value, "holiday value")?;
            accumulate(&mut summary.employee_total, line.total, "employee total")?;
        }
        for line in equipment {
            accumulate(&mut summary.equipment_total, line.total, "equipment total")?;
        }
        for line in materials {
            accumulate(&mut summary.material_total, line.total, "material total")?;
        }

        summary.grand_total = summary.employee_total;
        accumulate(&mut summary.grand_total, summary.equipment_total, "grand total")?;
        accumulate(&mut summary.grand_total, summary.material_total, "grand total")?;

        Ok(summary)
    }
}

fn accumulate(total: &mut Decimal, value: Decimal, field: &str) -> EngineResult<()> {
    *total = total
        .checked_add(value)
        .ok_or_else(|| EngineError::AmountOverflow {
            context: format!("bulletin {}", field),
        })?;
    Ok(())
}

/// A measurement bulletin for one site and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bulletin {
    /// Unique identifier.
    pub id: Uuid,
    /// The site the bulletin measures.
    pub site_id: String,
    /// The period covered.
    pub period: MeasurementPeriod,
    /// Source reports, sorted by id.
    pub source_reports: Vec<SourceReportRef>,
    /// Key identifying the exact input set the bulletin was generated from.
    pub dedupe_key: String,
    /// Labor lines in report date order.
    pub employee_lines: Vec<EmployeeLine>,
    /// Equipment lines in report date order.
    pub equipment_lines: Vec<EquipmentLine>,
    /// Material lines in report date order.
    pub material_lines: Vec<MaterialLine>,
    /// Aggregated totals.
    pub summary: FinancialSummary,
    /// Lifecycle status.
    pub status: BulletinStatus,
    /// Set once approved.
    pub approval: Option<Approval>,
    /// Set once invoiced.
    pub invoice: Option<InvoiceStamp>,
    /// The earlier bulletin for the same site and period that this one replaces.
    pub supersedes: Option<Uuid>,
    /// When the bulletin was generated.
    pub created_at: DateTime<Utc>,
}

/// Builds the dedupe key for a site, period and set of source reports.
///
/// The report list is sorted so the key does not depend on read order.
///
/// ```
/// use bulletin_engine::models::{dedupe_key, MeasurementPeriod, SourceReportRef};
/// use chrono::NaiveDate;
///
/// let period = MeasurementPeriod::single_day(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
/// let refs = vec![
///     SourceReportRef { report_id: "rdo-2".to_string(), revision: 1 },
///     SourceReportRef { report_id: "rdo-1".to_string(), revision: 4 },
/// ];
/// assert_eq!(
///     dedupe_key("site-a", &period, &refs),
///     "site-a|2026-03-10..2026-03-10|rdo-1@4,rdo-2@1"
/// );
/// ```
pub fn dedupe_key(site_id: &str, period: &MeasurementPeriod, reports: &[SourceReportRef]) -> String {
    let mut sorted: Vec<&SourceReportRef> = reports.iter().collect();
    sorted.sort();
    let reports = sorted
        .iter()
        .map(|r| format!("{}@{}", r.report_id, r.revision))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{}|{}..{}|{}",
        site_id, period.start_date, period.end_date, reports
    )
}
