//! Monetary valuation of classified hours, equipment, and materials.
//!
//! Labor value per shift is
//! `normal*rate + tier1*rate*m1 + tier2*rate*m2 + night*rate*m_night + holiday*rate*m_holiday`.
//! The night multiplier is an additive differential, so night hours are paid
//! on top of the bucket they already sit in. Amounts are kept exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PriceList;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ClassifiedHours, EmployeePayProfile, EquipmentEntry, EquipmentLine, MaterialEntry,
    MaterialLine,
};

/// The value of one shift's classified hours, per pay category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborValue {
    /// Normal hours at the base rate.
    pub normal_value: Decimal,
    /// Tier-1 overtime.
    pub tier1_value: Decimal,
    /// Tier-2 overtime.
    pub tier2_value: Decimal,
    /// Night differential.
    pub night_value: Decimal,
    /// Holiday hours.
    pub holiday_value: Decimal,
    /// Sum of all categories.
    pub total: Decimal,
}

/// Prices classified hours with the employee's rate and multipliers.
///
/// # Errors
///
/// Returns [`EngineError::AmountOverflow`] if a product or the total leaves
/// the decimal range.
///
/// # Example
///
/// ```
/// use bulletin_engine::calculation::value_hours;
/// use bulletin_engine::models::{ClassifiedHours, EmployeePayProfile};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let profile = EmployeePayProfile::with_rate("emp_001", Decimal::from(10));
/// let hours = ClassifiedHours {
///     employee_ref: "emp_001".to_string(),
///     total_hours: Decimal::from(12),
///     normal_hours: Decimal::from(8),
///     overtime_tier1_hours: Decimal::from(2),
///     overtime_tier2_hours: Decimal::from(2),
///     night_hours: Decimal::ZERO,
///     holiday_hours: Decimal::ZERO,
///     is_holiday: false,
/// };
///
/// let value = value_hours(&hours, &profile, Decimal::from(2)).unwrap();
/// // 8*10 + 2*10*1.6 + 2*10*2.0
/// assert_eq!(value.total, Decimal::from_str("152").unwrap());
/// ```
pub fn value_hours(
    hours: &ClassifiedHours,
    profile: &EmployeePayProfile,
    holiday_multiplier: Decimal,
) -> EngineResult<LaborValue> {
    let rate = profile.hourly_rate;
    let context = || format!("labor value for '{}'", hours.employee_ref);

    let normal_value = checked_product(&[hours.normal_hours, rate], context)?;
    let tier1_value = checked_product(
        &[hours.overtime_tier1_hours, rate, profile.tier1_multiplier],
        context,
    )?;
    let tier2_value = checked_product(
        &[hours.overtime_tier2_hours, rate, profile.tier2_multiplier],
        context,
    )?;
    let night_value =
        checked_product(&[hours.night_hours, rate, profile.night_multiplier], context)?;
    let holiday_value =
        checked_product(&[hours.holiday_hours, rate, holiday_multiplier], context)?;
    let total = checked_sum(
        &[normal_value, tier1_value, tier2_value, night_value, holiday_value],
        context,
    )?;

    Ok(LaborValue {
        normal_value,
        tier1_value,
        tier2_value,
        night_value,
        holiday_value,
        total,
    })
}

/// Prices an equipment entry.
///
/// A rate recorded on the entry wins over the price list.
///
/// # Errors
///
/// Returns [`EngineError::MissingUnitPrice`] if no rate is available, or
/// [`EngineError::AmountOverflow`] if the line total leaves the decimal range.
pub fn price_equipment(
    report_id: &str,
    entry: &EquipmentEntry,
    prices: &PriceList,
) -> EngineResult<EquipmentLine> {
    let hourly_rate = entry
        .hourly_rate
        .or_else(|| prices.equipment_rate(&entry.name, &entry.category))
        .ok_or_else(|| EngineError::MissingUnitPrice {
            kind: "equipment",
            name: entry.name.clone(),
            category: entry.category.clone(),
        })?;
    let total = checked_product(&[entry.hours_used, hourly_rate], || {
        format!("equipment '{}' in report '{}'", entry.name, report_id)
    })?;

    Ok(EquipmentLine {
        report_id: report_id.to_string(),
        name: entry.name.clone(),
        category: entry.category.clone(),
        hours_used: entry.hours_used,
        hourly_rate,
        total,
    })
}

/// Prices a material entry.
///
/// A unit price recorded on the entry wins over the price list.
///
/// # Errors
///
/// Returns [`EngineError::MissingUnitPrice`] if no price is available, or
/// [`EngineError::AmountOverflow`] if the line total leaves the decimal range.
pub fn price_material(
    report_id: &str,
    entry: &MaterialEntry,
    prices: &PriceList,
) -> EngineResult<MaterialLine> {
    let unit_price = entry
        .unit_price
        .or_else(|| prices.material_price(&entry.name, &entry.category))
        .ok_or_else(|| EngineError::MissingUnitPrice {
            kind: "material",
            name: entry.name.clone(),
            category: entry.category.clone(),
        })?;
    let total = checked_product(&[entry.quantity_used, unit_price], || {
        format!("material '{}' in report '{}'", entry.name, report_id)
    })?;

    Ok(MaterialLine {
        report_id: report_id.to_string(),
        name: entry.name.clone(),
        category: entry.category.clone(),
        quantity: entry.quantity_used,
        unit: entry.unit.clone(),
        unit_price,
        total,
    })
}

fn checked_product(factors: &[Decimal], context: impl Fn() -> String) -> EngineResult<Decimal> {
    let (first, rest) = match factors.split_first() {
        Some(split) => split,
        None => return Ok(Decimal::ZERO),
    };
    rest.iter()
        .try_fold(*first, |acc, factor| acc.checked_mul(*factor))
        .ok_or_else(|| EngineError::AmountOverflow { context: context() })
}

fn checked_sum(values: &[Decimal], context: impl Fn() -> String) -> EngineResult<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
        .ok_or_else(|| EngineError::AmountOverflow { context: context() })
}
