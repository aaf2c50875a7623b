//! Core data models for the bulletin engine.
//!
//! This module contains all the domain models used throughout the engine.

mod budget;
mod bulletin;
mod classified_hours;
mod daily_report;
mod pay_profile;
mod shift;
mod variance;

pub use budget::{Budget, ExecutionSnapshot};
pub use bulletin::{
    Approval, Bulletin, BulletinStatus, EmployeeLine, EquipmentLine, FinancialSummary,
    InvoiceStamp, MaterialLine, SourceReportRef, dedupe_key,
};
pub use classified_hours::{ClassifiedHours, PayCategory};
pub use daily_report::{
    DailyReport, EquipmentEntry, MaterialEntry, MeasurementPeriod, RosterEntry,
    TechnicalValidation,
};
pub use pay_profile::{
    DEFAULT_NIGHT_MULTIPLIER, DEFAULT_NORMAL_SHIFT_HOURS, DEFAULT_TIER1_MULTIPLIER,
    DEFAULT_TIER2_MULTIPLIER, EmployeePayProfile,
};
pub use shift::ShiftEntry;
pub use variance::{
    Alert, AlertCategory, DimensionStatus, Estimate, RecommendedAction, Severity, StatusTier,
    VarianceReport,
};
