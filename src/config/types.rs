//! Configuration types for the bulletin engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every section has a
//! `Default` matching the engine's built-in policy.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{
    DEFAULT_NIGHT_MULTIPLIER, DEFAULT_NORMAL_SHIFT_HOURS, DEFAULT_TIER1_MULTIPLIER,
    DEFAULT_TIER2_MULTIPLIER, EmployeePayProfile,
};

/// Default holiday/Sunday multiplier.
pub const DEFAULT_HOLIDAY_MULTIPLIER: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// What the aggregator does when an employee has no pay profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingProfilePolicy {
    /// Abort bulletin generation with `MissingPayProfile`.
    #[default]
    Fail,
    /// Price the employee with the configured default profile.
    UseDefault,
}

/// The clock-hour window that earns the night differential.
///
/// The window is `[start_hour, end_hour)` and wraps past midnight when
/// `start_hour > end_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NightWindow {
    /// First clock hour inside the window.
    pub start_hour: u32,
    /// First clock hour after the window.
    pub end_hour: u32,
}

impl Default for NightWindow {
    fn default() -> Self {
        Self {
            start_hour: 22,
            end_hour: 5,
        }
    }
}

impl NightWindow {
    /// Returns true if the clock hour (0-23) is inside the window.
    ///
    /// ```
    /// use bulletin_engine::config::NightWindow;
    ///
    /// let window = NightWindow::default();
    /// assert!(window.contains(22));
    /// assert!(window.contains(0));
    /// assert!(window.contains(4));
    /// assert!(!window.contains(5));
    /// assert!(!window.contains(21));
    /// ```
    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

/// Pay profile used when the registry has none for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DefaultPayProfile {
    /// Hours in a normal working day.
    #[serde(default = "default_normal_shift_hours")]
    pub normal_shift_hours: Decimal,
    /// Tier-1 overtime multiplier.
    #[serde(default = "default_tier1_multiplier")]
    pub tier1_multiplier: Decimal,
    /// Tier-2 overtime multiplier.
    #[serde(default = "default_tier2_multiplier")]
    pub tier2_multiplier: Decimal,
    /// Night differential multiplier.
    #[serde(default = "default_night_multiplier")]
    pub night_multiplier: Decimal,
    /// Base hourly rate.
    pub hourly_rate: Decimal,
}

impl DefaultPayProfile {
    /// Binds the default rates to an employee.
    pub fn to_profile(&self, employee_ref: &str) -> EmployeePayProfile {
        EmployeePayProfile {
            employee_ref: employee_ref.to_string(),
            normal_shift_hours: self.normal_shift_hours,
            tier1_multiplier: self.tier1_multiplier,
            tier2_multiplier: self.tier2_multiplier,
            night_multiplier: self.night_multiplier,
            hourly_rate: self.hourly_rate,
        }
    }
}

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

fn default_holiday_multiplier() -> Decimal {
    DEFAULT_HOLIDAY_MULTIPLIER
}

/// Pay rules from engine.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayRules {
    /// Multiplier applied to every holiday hour.
    #[serde(default = "default_holiday_multiplier")]
    pub holiday_multiplier: Decimal,
    /// Night differential window.
    #[serde(default)]
    pub night_window: NightWindow,
    /// Missing profile handling.
    #[serde(default)]
    pub missing_profile_policy: MissingProfilePolicy,
    /// Profile used under `use_default`.
    #[serde(default)]
    pub default_profile: Option<DefaultPayProfile>,
}

impl Default for PayRules {
    fn default() -> Self {
        Self {
            holiday_multiplier: DEFAULT_HOLIDAY_MULTIPLIER,
            night_window: NightWindow::default(),
            missing_profile_policy: MissingProfilePolicy::Fail,
            default_profile: None,
        }
    }
}

/// A dated holiday.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Holiday {
    /// Holiday date.
    pub date: NaiveDate,
    /// Holiday name.
    pub name: String,
}

fn default_true() -> bool {
    true
}

/// Holiday calendar from holidays.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HolidayConfig {
    /// Whether every Sunday is paid as a holiday.
    #[serde(default = "default_true")]
    pub sundays_are_holidays: bool,
    /// Dated holidays.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

impl Default for HolidayConfig {
    fn default() -> Self {
        Self {
            sundays_are_holidays: true,
            holidays: Vec::new(),
        }
    }
}

/// Equipment and material unit prices from prices.yaml.
///
/// Lookups try the item name first and fall back to its category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PriceList {
    /// Hourly rate by equipment name.
    #[serde(default)]
    pub equipment: HashMap<String, Decimal>,
    /// Hourly rate by equipment category.
    #[serde(default)]
    pub equipment_categories: HashMap<String, Decimal>,
    /// Unit price by material name.
    #[serde(default)]
    pub materials: HashMap<String, Decimal>,
    /// Unit price by material category.
    #[serde(default)]
    pub material_categories: HashMap<String, Decimal>,
}

impl PriceList {
    /// Hourly rate for a piece of equipment.
    pub fn equipment_rate(&self, name: &str, category: &str) -> Option<Decimal> {
        self.equipment
            .get(name)
            .or_else(|| self.equipment_categories.get(category))
            .copied()
    }

    /// Unit price for a material.
    pub fn material_price(&self, name: &str, category: &str) -> Option<Decimal> {
        self.materials
            .get(name)
            .or_else(|| self.material_categories.get(category))
            .copied()
    }
}

/// Variance tier thresholds from thresholds.yaml, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct VarianceThresholds {
    /// Cost variance above this is a warning.
    pub cost_warning_pct: Decimal,
    /// Cost variance above this is danger.
    pub cost_danger_pct: Decimal,
    /// Efficiency below this is a warning.
    pub efficiency_warning_pct: Decimal,
    /// Efficiency below this is danger.
    pub efficiency_danger_pct: Decimal,
    /// Hour variance above this is a warning.
    pub hours_warning_pct: Decimal,
    /// Hour variance above this is danger.
    pub hours_danger_pct: Decimal,
}

impl Default for VarianceThresholds {
    fn default() -> Self {
        Self {
            cost_warning_pct: Decimal::from(5),
            cost_danger_pct: Decimal::from(15),
            efficiency_warning_pct: Decimal::from(85),
            efficiency_danger_pct: Decimal::from(70),
            hours_warning_pct: Decimal::from(10),
            hours_danger_pct: Decimal::from(20),
        }
    }
}

/// Thresholds file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    /// Variance thresholds.
    pub variance: VarianceThresholds,
}

/// Engine file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineFile {
    /// Pay rules section.
    pub pay: PayRules,
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Pay rules.
    pub pay: PayRules,
    /// Holiday calendar.
    pub holidays: HolidayConfig,
    /// Unit prices.
    pub prices: PriceList,
    /// Variance thresholds.
    pub thresholds: VarianceThresholds,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_night_window_non_wrapping() {
        let window = NightWindow {
            start_hour: 1,
            end_hour: 4,
        };
        assert!(!window.contains(0));
        assert!(window.contains(1));
        assert!(window.contains(3));
        assert!(!window.contains(4));
    }

    #[test]
    fn test_empty_night_window() {
        let window = NightWindow {
            start_hour: 3,
            end_hour: 3,
        };
        assert!((0..24).all(|h| !window.contains(h)));
    }

    #[test]
    fn test_price_list_falls_back_to_category() {
        let mut prices = PriceList::default();
        prices.equipment.insert("Crane 50t".to_string(), dec("320"));
        prices
            .equipment_categories
            .insert("lifting".to_string(), dec("250"));

        assert_eq!(prices.equipment_rate("Crane 50t", "lifting"), Some(dec("320")));
        assert_eq!(prices.equipment_rate("Crane 30t", "lifting"), Some(dec("250")));
        assert_eq!(prices.equipment_rate("Welder", "welding"), None);
    }

    #[test]
    fn test_pay_rules_defaults_from_empty_yaml() {
        let rules: PayRules = serde_yaml::from_str("{}").unwrap();
        assert_eq!(rules.holiday_multiplier, dec("2"));
        assert_eq!(rules.night_window, NightWindow::default());
        assert_eq!(rules.missing_profile_policy, MissingProfilePolicy::Fail);
        assert!(rules.default_profile.is_none());
    }

    #[test]
    fn test_default_profile_binds_employee() {
        let yaml = "hourly_rate: 22.50\n";
        let default: DefaultPayProfile = serde_yaml::from_str(yaml).unwrap();
        let profile = default.to_profile("emp_404");

        assert_eq!(profile.employee_ref, "emp_404");
        assert_eq!(profile.hourly_rate, dec("22.50"));
        assert_eq!(profile.tier1_multiplier, dec("1.6"));
    }

    #[test]
    fn test_default_thresholds() {
        let t = VarianceThresholds::default();
        assert_eq!(t.cost_danger_pct, dec("15"));
        assert_eq!(t.efficiency_danger_pct, dec("70"));
        assert_eq!(t.hours_warning_pct, dec("10"));
    }
}
