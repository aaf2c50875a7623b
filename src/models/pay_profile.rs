//! Employee pay profile model.
//!
//! A pay profile is owned by the external employee registry and is treated
//! as immutable for the duration of a single classification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default tier-1 overtime multiplier (first two overtime hours).
pub const DEFAULT_TIER1_MULTIPLIER: Decimal = Decimal::from_parts(16, 0, 0, false, 1);

/// Default tier-2 overtime multiplier (overtime beyond two hours).
pub const DEFAULT_TIER2_MULTIPLIER: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Default night differential. This is an additive premium, not a replacement rate.
pub const DEFAULT_NIGHT_MULTIPLIER: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Default normal daily shift length in hours.
pub const DEFAULT_NORMAL_SHIFT_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

fn default_normal_shift_hours() -> Decimal {
    DEFAULT_NORMAL_SHIFT_HOURS
}

fn default_tier1_multiplier() -> Decimal {
    DEFAULT_TIER1_MULTIPLIER
}

fn default_tier2_multiplier() -> Decimal {
    DEFAULT_TIER2_MULTIPLIER
}

fn default_night_multiplier() -> Decimal {
    DEFAULT_NIGHT_MULTIPLIER
}

/// The rate configuration used to classify and price an employee's hours.
///
/// # Example
///
/// ```
/// use bulletin_engine::models::EmployeePayProfile;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let profile = EmployeePayProfile::with_rate("emp_001", Decimal::from_str("45.00").unwrap());
/// assert_eq!(profile.normal_shift_hours, Decimal::from(8));
/// assert_eq!(profile.tier1_multiplier, Decimal::from_str("1.6").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePayProfile {
    /// Reference to the employee in the external registry.
    pub employee_ref: String,
    /// Hours in a normal working day before overtime starts.
    #[serde(default = "default_normal_shift_hours")]
    pub normal_shift_hours: Decimal,
    /// Multiplier for the first two overtime hours.
    #[serde(default = "default_tier1_multiplier")]
    pub tier1_multiplier: Decimal,
    /// Multiplier for overtime beyond two hours.
    #[serde(default = "default_tier2_multiplier")]
    pub tier2_multiplier: Decimal,
    /// Additive night differential multiplier.
    #[serde(default = "default_night_multiplier")]
    pub night_multiplier: Decimal,
    /// Base hourly rate.
    pub hourly_rate: Decimal,
}

impl EmployeePayProfile {
    /// Creates a profile with the default shift length and multipliers.
    pub fn with_rate(employee_ref: impl Into<String>, hourly_rate: Decimal) -> Self {
        Self {
            employee_ref: employee_ref.into(),
            normal_shift_hours: DEFAULT_NORMAL_SHIFT_HOURS,
            tier1_multiplier: DEFAULT_TIER1_MULTIPLIER,
            tier2_multiplier: DEFAULT_TIER2_MULTIPLIER,
            night_multiplier: DEFAULT_NIGHT_MULTIPLIER,
            hourly_rate,
        }
    }

    /// Returns a copy of this profile bound to a different employee.
    ///
    /// Used when the configured default profile stands in for an employee
    /// the registry does not know.
    pub fn for_employee(&self, employee_ref: impl Into<String>) -> Self {
        Self {
            employee_ref: employee_ref.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_multipliers() {
        assert_eq!(DEFAULT_TIER1_MULTIPLIER, dec("1.6"));
        assert_eq!(DEFAULT_TIER2_MULTIPLIER, dec("2.0"));
        assert_eq!(DEFAULT_NIGHT_MULTIPLIER, dec("0.25"));
        assert_eq!(DEFAULT_NORMAL_SHIFT_HOURS, dec("8"));
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let json = r#"{ "employee_ref": "emp_001", "hourly_rate": "30.00" }"#;
        let profile: EmployeePayProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.normal_shift_hours, dec("8"));
        assert_eq!(profile.tier1_multiplier, dec("1.6"));
        assert_eq!(profile.tier2_multiplier, dec("2.0"));
        assert_eq!(profile.night_multiplier, dec("0.25"));
        assert_eq!(profile.hourly_rate, dec("30.00"));
    }

    #[test]
    fn test_deserialize_overrides() {
        let json = r#"{
            "employee_ref": "emp_002",
            "normal_shift_hours": "9",
            "tier1_multiplier": "1.5",
            "tier2_multiplier": "1.8",
            "night_multiplier": "0.2",
            "hourly_rate": "28.40"
        }"#;
        let profile: EmployeePayProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.normal_shift_hours, dec("9"));
        assert_eq!(profile.tier1_multiplier, dec("1.5"));
        assert_eq!(profile.night_multiplier, dec("0.2"));
    }

    #[test]
    fn test_for_employee_keeps_rates() {
        let default = EmployeePayProfile::with_rate("default", dec("25.00"));
        let bound = default.for_employee("emp_777");

        assert_eq!(bound.employee_ref, "emp_777");
        assert_eq!(bound.hourly_rate, dec("25.00"));
        assert_eq!(bound.tier2_multiplier, default.tier2_multiplier);
    }
}
