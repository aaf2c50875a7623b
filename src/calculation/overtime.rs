//! Overtime split for regular (non-holiday) shifts.
//!
//! Hours up to the employee's normal shift length are normal time. The first
//! two hours beyond it are tier-1 overtime, anything further is tier-2.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The number of overtime hours paid at the tier-1 rate before tier 2 starts.
pub const TIER1_OVERTIME_CAP: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Worked hours split into normal time and the two overtime tiers.
///
/// `normal + tier1 + tier2` always equals the hours that were split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeSplit {
    /// Hours up to the normal shift length.
    pub normal_hours: Decimal,
    /// Overtime hours at the tier-1 rate.
    pub tier1_hours: Decimal,
    /// Overtime hours at the tier-2 rate.
    pub tier2_hours: Decimal,
}

/// Splits worked hours against the normal shift length.
///
/// # Examples
///
/// ## 12 hours against an 8-hour day
///
/// ```
/// use bulletin_engine::calculation::split_overtime;
/// use rust_decimal::Decimal;
///
/// let split = split_overtime(Decimal::from(12), Decimal::from(8));
/// assert_eq!(split.normal_hours, Decimal::from(8));
/// assert_eq!(split.tier1_hours, Decimal::from(2));
/// assert_eq!(split.tier2_hours, Decimal::from(2));
/// ```
///
/// ## Short shift
///
/// ```
/// use bulletin_engine::calculation::split_overtime;
/// use rust_decimal::Decimal;
///
/// let split = split_overtime(Decimal::from(6), Decimal::from(8));
/// assert_eq!(split.normal_hours, Decimal::from(6));
/// assert_eq!(split.tier1_hours, Decimal::ZERO);
/// assert_eq!(split.tier2_hours, Decimal::ZERO);
/// ```
pub fn split_overtime(worked_hours: Decimal, normal_shift_hours: Decimal) -> OvertimeSplit {
    let threshold = normal_shift_hours.max(Decimal::ZERO);
    let normal_hours = worked_hours.min(threshold);
    let remainder = worked_hours - normal_hours;

    let (tier1_hours, tier2_hours) = if remainder <= TIER1_OVERTIME_CAP {
        (remainder, Decimal::ZERO)
    } else {
        (TIER1_OVERTIME_CAP, remainder - TIER1_OVERTIME_CAP)
    };

    OvertimeSplit {
        normal_hours,
        tier1_hours,
        tier2_hours,
    }
}
