//! Variance report models.
//!
//! Every computed figure in a [`VarianceReport`] is an [`Estimate`]: either a
//! known value or an indeterminate state carrying the reason, so a single
//! zero denominator does not fail the whole report.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A computed figure that may not be derivable from the inputs.
///
/// # Example
///
/// ```
/// use bulletin_engine::models::Estimate;
/// use rust_decimal::Decimal;
///
/// let known = Estimate::known(Decimal::from(42));
/// assert_eq!(known.value("cost").unwrap(), Decimal::from(42));
///
/// let unknown: Estimate<Decimal> = Estimate::indeterminate("percent complete is zero");
/// assert!(unknown.value("cost").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Estimate<T> {
    /// The figure was computed.
    Known {
        /// The computed value.
        value: T,
    },
    /// The figure cannot be computed.
    Indeterminate {
        /// Why the figure is indeterminate.
        reason: String,
    },
}

impl<T> Estimate<T> {
    /// Wraps a computed value.
    pub fn known(value: T) -> Self {
        Self::Known { value }
    }

    /// Marks the figure indeterminate.
    pub fn indeterminate(reason: impl Into<String>) -> Self {
        Self::Indeterminate {
            reason: reason.into(),
        }
    }

    /// Returns true if the figure could not be computed.
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Self::Indeterminate { .. })
    }

    /// Returns the value, if known.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::Known { value } => Some(value),
            Self::Indeterminate { .. } => None,
        }
    }

    /// Applies `f` to a known value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Estimate<U> {
        match self {
            Self::Known { value } => Estimate::Known { value: f(value) },
            Self::Indeterminate { reason } => Estimate::Indeterminate { reason },
        }
    }

    /// Chains a computation that may itself be indeterminate.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Estimate<U>) -> Estimate<U> {
        match self {
            Self::Known { value } => f(value),
            Self::Indeterminate { reason } => Estimate::Indeterminate { reason },
        }
    }
}

impl<T: Clone> Estimate<T> {
    /// Returns the value or an `IndeterminateProjection` error naming `field`.
    pub fn value(&self, field: &str) -> EngineResult<T> {
        match self {
            Self::Known { value } => Ok(value.clone()),
            Self::Indeterminate { reason } => Err(EngineError::IndeterminateProjection {
                field: field.to_string(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Traffic-light tier for a variance dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    /// Within tolerance.
    Ok,
    /// Past the warning threshold.
    Warning,
    /// Past the danger threshold.
    Danger,
    /// The underlying figure could not be computed.
    Indeterminate,
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Needs attention.
    Warning,
    /// Needs immediate action.
    Danger,
}

impl Severity {
    /// The severity matching a status tier, if the tier raises an alert.
    pub fn from_tier(tier: StatusTier) -> Option<Self> {
        match tier {
            StatusTier::Warning => Some(Self::Warning),
            StatusTier::Danger => Some(Self::Danger),
            StatusTier::Ok | StatusTier::Indeterminate => None,
        }
    }
}

/// What an alert is about.
///
/// Declaration order is the tie-break order for ranking recommended actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    /// Certification and calibration.
    Compliance,
    /// Cost against budget.
    Budget,
    /// Progress against plan.
    Schedule,
    /// Labor efficiency.
    Productivity,
}

/// A single threshold crossing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// What the alert is about.
    pub category: AlertCategory,
    /// How urgent it is.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// What to do about it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// A ranked action drawn from the alert list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedAction {
    /// 1-based rank, most urgent first.
    pub rank: u32,
    /// The category of the alert that produced it.
    pub category: AlertCategory,
    /// The severity of the alert that produced it.
    pub severity: Severity,
    /// The action text.
    pub action: String,
}

/// Status tier per variance dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionStatus {
    /// Hour variance tier.
    pub hours: StatusTier,
    /// Cost variance tier.
    pub cost: StatusTier,
    /// Efficiency tier.
    pub efficiency: StatusTier,
    /// Projected overrun tier.
    pub projected_overrun: StatusTier,
}

/// Execution compared against budget.
///
/// Recomputed on demand and never persisted as authoritative state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceReport {
    /// The site the report covers.
    pub site_id: String,
    /// Date of the execution snapshot.
    pub as_of: NaiveDate,
    /// `(executed - planned) / planned * 100`.
    pub hour_variance_pct: Estimate<Decimal>,
    /// `(realized - budgeted) / budgeted * 100` on the hourly cost.
    pub cost_variance_pct: Estimate<Decimal>,
    /// Average of the hour and cost ratios, as a percentage.
    pub efficiency_pct: Estimate<Decimal>,
    /// Tier per dimension.
    pub status: DimensionStatus,
    /// Projected cost at completion.
    pub projected_final_cost: Estimate<Decimal>,
    /// Projected cost against planned contract value, as a percentage over.
    pub projected_overrun_pct: Estimate<Decimal>,
    /// Projected completion date.
    pub projected_completion: Estimate<NaiveDate>,
    /// Ranked actions, most urgent first.
    pub recommended_actions: Vec<RecommendedAction>,
    /// Threshold crossings.
    pub alerts: Vec<Alert>,
}
