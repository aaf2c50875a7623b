//! Request types for the bulletin engine API.
//!
//! This module defines the JSON request bodies and their conversion into
//! domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    Budget, DEFAULT_NIGHT_MULTIPLIER, DEFAULT_NORMAL_SHIFT_HOURS, DEFAULT_TIER1_MULTIPLIER,
    DEFAULT_TIER2_MULTIPLIER, DailyReport, EmployeePayProfile, EquipmentEntry, ExecutionSnapshot,
    MaterialEntry, MeasurementPeriod, RosterEntry, TechnicalValidation,
};

use super::response::ApiError;

/// Request body for `POST /daily-reports`.
///
/// The revision is assigned by the store, so it is not part of the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReportRequest {
    /// Unique identifier of the report.
    pub id: String,
    /// The site the report belongs to.
    pub site_id: String,
    /// The work date.
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

impl DailyReportRequest {
    /// Checks the fields the store relies on.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.id.trim().is_empty() {
            return Err(ApiError::validation_error("id must not be empty"));
        }
        if self.site_id.trim().is_empty() {
            return Err(ApiError::validation_error("site_id must not be empty"));
        }
        if self.roster.iter().any(|r| r.employee_ref.trim().is_empty()) {
            return Err(ApiError::validation_error(
                "roster entries must have an employee_ref",
            ));
        }
        let negative_equipment = self.equipment.iter().any(|e| e.hours_used < Decimal::ZERO);
        let negative_material = self.materials.iter().any(|m| m.quantity_used < Decimal::ZERO);
        if negative_equipment || negative_material {
            return Err(ApiError::validation_error(
                "equipment hours and material quantities must not be negative",
            ));
        }
        Ok(())
    }
}

impl From<DailyReportRequest> for DailyReport {
    fn from(req: DailyReportRequest) -> Self {
        DailyReport {
            id: req.id,
            revision: 1,
            site_id: req.site_id,
            date: req.date,
            roster: req.roster,
            equipment: req.equipment,
            materials: req.materials,
            technical_validation: req.technical_validation,
        }
    }
}

/// Request body for `PUT /employees/{ref}/pay-profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayProfileRequest {
    /// Base hourly rate.
    pub hourly_rate: Decimal,
    /// Hours in a normal working day.
    #[serde(default)]
    pub normal_shift_hours: Option<Decimal>,
    /// Tier-1 overtime multiplier.
    #[serde(default)]
    pub tier1_multiplier: Option<Decimal>,
    /// Tier-2 overtime multiplier.
    #[serde(default)]
    pub tier2_multiplier: Option<Decimal>,
    /// Night differential multiplier.
    #[serde(default)]
    pub night_multiplier: Option<Decimal>,
}

impl PayProfileRequest {
    /// Rejects negative rates, multipliers and shift lengths.
    pub fn validate(&self) -> Result<(), ApiError> {
        let fields = [
            ("hourly_rate", Some(self.hourly_rate)),
            ("normal_shift_hours", self.normal_shift_hours),
            ("tier1_multiplier", self.tier1_multiplier),
            ("tier2_multiplier", self.tier2_multiplier),
            ("night_multiplier", self.night_multiplier),
        ];
        for (name, value) in fields {
            if value.is_some_and(|v| v < Decimal::ZERO) {
                return Err(ApiError::validation_error(format!(
                    "{} must not be negative",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Builds the profile for an employee, filling unset fields with defaults.
    pub fn into_profile(self, employee_ref: &str) -> EmployeePayProfile {
        EmployeePayProfile {
            employee_ref: employee_ref.to_string(),
            normal_shift_hours: self.normal_shift_hours.unwrap_or(DEFAULT_NORMAL_SHIFT_HOURS),
            tier1_multiplier: self.tier1_multiplier.unwrap_or(DEFAULT_TIER1_MULTIPLIER),
            tier2_multiplier: self.tier2_multiplier.unwrap_or(DEFAULT_TIER2_MULTIPLIER),
            night_multiplier: self.night_multiplier.unwrap_or(DEFAULT_NIGHT_MULTIPLIER),
            hourly_rate: self.hourly_rate,
        }
    }
}

/// Request body for `POST /bulletins`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateBulletinRequest {
    /// The site to measure.
    pub site_id: String,
    /// The period to cover.
    pub period: MeasurementPeriod,
}

impl GenerateBulletinRequest {
    /// Checks the site id.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.site_id.trim().is_empty() {
            return Err(ApiError::validation_error("site_id must not be empty"));
        }
        Ok(())
    }
}

/// Request body for `POST /bulletins/{id}/approve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveRequest {
    /// Identity of the approver.
    pub approver_id: String,
}

impl ApproveRequest {
    /// Checks the approver id.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.approver_id.trim().is_empty() {
            return Err(ApiError::validation_error("approver_id must not be empty"));
        }
        Ok(())
    }
}

/// Request body for `POST /bulletins/{id}/invoice`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRequest {
    /// Reference of the invoice in the billing system.
    pub invoice_ref: String,
}

impl InvoiceRequest {
    /// Checks the invoice reference.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.invoice_ref.trim().is_empty() {
            return Err(ApiError::validation_error("invoice_ref must not be empty"));
        }
        Ok(())
    }
}

/// Request body for `POST /variance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarianceRequest {
    /// Cumulative execution figures.
    pub snapshot: ExecutionSnapshot,
    /// The budget to compare against.
    pub budget: Budget,
}
