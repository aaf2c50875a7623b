//! Classified hour buckets produced by the time classifier.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The pay categories an hour of labor can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayCategory {
    /// Hours within the normal daily shift length.
    Normal,
    /// The first two hours beyond the normal shift.
    OvertimeTier1,
    /// Overtime beyond the first two hours.
    OvertimeTier2,
    /// Night differential premium, additive to the base category.
    Night,
    /// Holiday or Sunday double time.
    Holiday,
}

/// Hours worked in a single shift, split into pay categories.
///
/// On a regular day `normal + tier1 + tier2 == total`. Night hours are
/// counted again on top of their base bucket. On a holiday every hour is a
/// holiday hour and the other buckets are zero.
///
/// # Example
///
/// ```
/// use bulletin_engine::models::ClassifiedHours;
/// use rust_decimal::Decimal;
///
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
/// assert!(hours.is_consistent());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedHours {
    /// Reference to the employee who worked the hours.
    pub employee_ref: String,
    /// Total hours worked in the shift.
    pub total_hours: Decimal,
    /// Hours within the normal shift length.
    pub normal_hours: Decimal,
    /// Tier-1 overtime hours.
    pub overtime_tier1_hours: Decimal,
    /// Tier-2 overtime hours.
    pub overtime_tier2_hours: Decimal,
    /// Hours inside the night window.
    pub night_hours: Decimal,
    /// Hours worked on a holiday or Sunday.
    pub holiday_hours: Decimal,
    /// Whether the work date is a holiday or Sunday.
    pub is_holiday: bool,
}

impl ClassifiedHours {
    /// Hours recorded in a given category.
    pub fn hours_in(&self, category: PayCategory) -> Decimal {
        match category {
            PayCategory::Normal => self.normal_hours,
            PayCategory::OvertimeTier1 => self.overtime_tier1_hours,
            PayCategory::OvertimeTier2 => self.overtime_tier2_hours,
            PayCategory::Night => self.night_hours,
            PayCategory::Holiday => self.holiday_hours,
        }
    }

    /// Checks the bucket invariants for the holiday flag.
    pub fn is_consistent(&self) -> bool {
        if self.is_holiday {
            self.normal_hours.is_zero()
                && self.overtime_tier1_hours.is_zero()
                && self.overtime_tier2_hours.is_zero()
                && self.holiday_hours == self.total_hours
        } else {
            self.normal_hours + self.overtime_tier1_hours + self.overtime_tier2_hours
                == self.total_hours
                && self.holiday_hours.is_zero()
        }
    }
}
