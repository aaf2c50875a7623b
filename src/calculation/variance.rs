//! Budget variance analysis.
//!
//! Compares a cumulative [`ExecutionSnapshot`] against a [`Budget`] and
//! produces a [`VarianceReport`]. Every ratio is guarded: a zero denominator
//! yields an indeterminate figure for that field and leaves the rest of the
//! report intact.

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::config::VarianceThresholds;
use crate::models::{
    Alert, AlertCategory, Budget, DimensionStatus, Estimate, ExecutionSnapshot,
    RecommendedAction, Severity, StatusTier, VarianceReport,
};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Computes the variance report for a snapshot.
///
/// # Example
///
/// ```
/// use bulletin_engine::calculation::compute_variance;
/// use bulletin_engine::config::VarianceThresholds;
/// use bulletin_engine::models::{Budget, ExecutionSnapshot, StatusTier};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let budget = Budget {
///     site_id: "site-a".to_string(),
///     planned_hours_total: Decimal::from(10_000),
///     avg_hourly_cost: Decimal::from(50),
///     planned_value_total: Decimal::from(500_000),
///     planned_completion: None,
/// };
/// let snapshot = ExecutionSnapshot {
///     hours_executed: Decimal::from(1000),
///     hours_planned_to_date: Decimal::from(1000),
///     realized_hourly_cost: Decimal::from(50),
///     cost_to_date: Decimal::from(50_000),
///     percent_complete: Decimal::from(10),
///     elapsed_days: 10,
///     as_of: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
///     technical_validation: Default::default(),
/// };
///
/// let report = compute_variance(&snapshot, &budget, &VarianceThresholds::default());
/// assert_eq!(report.status.cost, StatusTier::Ok);
/// assert_eq!(report.projected_final_cost.value("projected_final_cost").unwrap(), Decimal::from(500_000));
/// assert!(report.alerts.is_empty());
/// ```
pub fn compute_variance(
    snapshot: &ExecutionSnapshot,
    budget: &Budget,
    thresholds: &VarianceThresholds,
) -> VarianceReport {
    let hour_variance_pct = pct_change(
        snapshot.hours_executed,
        snapshot.hours_planned_to_date,
        "hours planned to date is zero",
    );
    let cost_variance_pct = pct_change(
        snapshot.realized_hourly_cost,
        budget.avg_hourly_cost,
        "budgeted hourly cost is zero",
    );
    let efficiency_pct = efficiency(snapshot, budget);

    let projected_final_cost = projected_final_cost(snapshot);
    let projected_overrun_pct = projected_final_cost.clone().and_then(|cost| {
        pct_change(
            cost,
            budget.planned_value_total,
            "planned contract value is zero",
        )
    });
    let projected_completion = projected_completion(snapshot);

    let status = DimensionStatus {
        hours: above_tier(
            &hour_variance_pct,
            thresholds.hours_warning_pct,
            thresholds.hours_danger_pct,
        ),
        cost: above_tier(
            &cost_variance_pct,
            thresholds.cost_warning_pct,
            thresholds.cost_danger_pct,
        ),
        efficiency: below_tier(
            &efficiency_pct,
            thresholds.efficiency_warning_pct,
            thresholds.efficiency_danger_pct,
        ),
        projected_overrun: above_tier(
            &projected_overrun_pct,
            thresholds.cost_warning_pct,
            thresholds.cost_danger_pct,
        ),
    };

    let mut alerts = Vec::new();
    compliance_alerts(snapshot, &mut alerts);
    push_tier_alert(
        &mut alerts,
        AlertCategory::Budget,
        status.cost,
        &cost_variance_pct,
        "Hourly cost variance",
        "Review crew composition and overtime authorizations",
    );
    push_tier_alert(
        &mut alerts,
        AlertCategory::Budget,
        status.projected_overrun,
        &projected_overrun_pct,
        "Projected overrun against contract value",
        "Renegotiate scope or raise a contract change request",
    );
    push_tier_alert(
        &mut alerts,
        AlertCategory::Schedule,
        status.hours,
        &hour_variance_pct,
        "Man-hour variance",
        "Re-baseline the schedule for the affected work fronts",
    );
    if let (Some(projected), Some(planned)) =
        (projected_completion.as_option(), budget.planned_completion)
    {
        if *projected > planned {
            alerts.push(Alert {
                category: AlertCategory::Schedule,
                severity: Severity::Danger,
                message: format!(
                    "Projected completion {} is after planned completion {}",
                    projected, planned
                ),
                suggested_action: Some(
                    "Add shifts or crews to recover the critical path".to_string(),
                ),
            });
        }
    }
    push_tier_alert(
        &mut alerts,
        AlertCategory::Productivity,
        status.efficiency,
        &efficiency_pct,
        "Labor efficiency",
        "Investigate idle time and rework on site",
    );

    let recommended_actions = rank_actions(&alerts);

    debug!(
        site_id = %budget.site_id,
        as_of = %snapshot.as_of,
        alerts = alerts.len(),
        "Computed variance report"
    );

    VarianceReport {
        site_id: budget.site_id.clone(),
        as_of: snapshot.as_of,
        hour_variance_pct,
        cost_variance_pct,
        efficiency_pct,
        status,
        projected_final_cost,
        projected_overrun_pct,
        projected_completion,
        recommended_actions,
        alerts,
    }
}

/// `(actual - reference) / reference * 100`, signed.
fn pct_change(actual: Decimal, reference: Decimal, reason: &str) -> Estimate<Decimal> {
    if reference.is_zero() {
        return Estimate::indeterminate(reason);
    }
    match actual.checked_sub(reference) {
        Some(delta) => ratio(delta, reference, reason).and_then(percent),
        None => overflow(),
    }
}

fn ratio(numerator: Decimal, denominator: Decimal, reason: &str) -> Estimate<Decimal> {
    if denominator.is_zero() {
        return Estimate::indeterminate(reason);
    }
    match numerator.checked_div(denominator) {
        Some(value) => Estimate::known(value),
        None => overflow(),
    }
}

fn percent(fraction: Decimal) -> Estimate<Decimal> {
    match fraction.checked_mul(HUNDRED) {
        Some(value) => Estimate::known(value),
        None => overflow(),
    }
}

fn overflow<T>() -> Estimate<T> {
    Estimate::indeterminate("value exceeds the decimal range")
}

fn efficiency(snapshot: &ExecutionSnapshot, budget: &Budget) -> Estimate<Decimal> {
    let hour_ratio = ratio(
        snapshot.hours_planned_to_date,
        snapshot.hours_executed,
        "no hours executed",
    );
    let cost_ratio = ratio(
        budget.avg_hourly_cost,
        snapshot.realized_hourly_cost,
        "realized hourly cost is zero",
    );

    hour_ratio.and_then(|h| {
        cost_ratio.and_then(|c| match h.checked_add(c) {
            Some(sum) => percent(sum / Decimal::TWO),
            None => overflow(),
        })
    })
}

fn projected_final_cost(snapshot: &ExecutionSnapshot) -> Estimate<Decimal> {
    if snapshot.percent_complete <= Decimal::ZERO {
        return Estimate::indeterminate("percent complete is zero");
    }
    ratio(
        snapshot.cost_to_date,
        snapshot.percent_complete,
        "percent complete is zero",
    )
    .and_then(percent)
}

fn projected_completion(snapshot: &ExecutionSnapshot) -> Estimate<chrono::NaiveDate> {
    let pct = snapshot.percent_complete;
    if pct <= Decimal::ZERO {
        return Estimate::indeterminate("percent complete is zero");
    }
    if snapshot.elapsed_days == 0 {
        return Estimate::indeterminate("no days elapsed");
    }
    if pct >= HUNDRED {
        return Estimate::known(snapshot.as_of);
    }

    let daily_rate = pct / Decimal::from(snapshot.elapsed_days);
    ratio(HUNDRED - pct, daily_rate, "progress rate is zero").and_then(|days| {
        days.ceil()
            .to_i64()
            .and_then(Duration::try_days)
            .and_then(|d| snapshot.as_of.checked_add_signed(d))
            .map(Estimate::known)
            .unwrap_or_else(|| Estimate::indeterminate("projected completion is out of range"))
    })
}

/// Tier for figures where larger is worse.
fn above_tier(value: &Estimate<Decimal>, warning: Decimal, danger: Decimal) -> StatusTier {
    match value.as_option() {
        None => StatusTier::Indeterminate,
        Some(v) if *v > danger => StatusTier::Danger,
        Some(v) if *v > warning => StatusTier::Warning,
        Some(_) => StatusTier::Ok,
    }
}

/// Tier for figures where smaller is worse.
fn below_tier(value: &Estimate<Decimal>, warning: Decimal, danger: Decimal) -> StatusTier {
    match value.as_option() {
        None => StatusTier::Indeterminate,
        Some(v) if *v < danger => StatusTier::Danger,
        Some(v) if *v < warning => StatusTier::Warning,
        Some(_) => StatusTier::Ok,
    }
}

fn compliance_alerts(snapshot: &ExecutionSnapshot, alerts: &mut Vec<Alert>) {
    let validation = &snapshot.technical_validation;
    if !validation.certified {
        alerts.push(Alert {
            category: AlertCategory::Compliance,
            severity: Severity::Danger,
            message: "Work is not certified".to_string(),
            suggested_action: Some("Obtain technical certification before invoicing".to_string()),
        });
    }
    if !validation.calibrated {
        alerts.push(Alert {
            category: AlertCategory::Compliance,
            severity: Severity::Warning,
            message: "Measuring instruments are not calibrated".to_string(),
            suggested_action: Some("Schedule instrument calibration".to_string()),
        });
    }
}

fn push_tier_alert(
    alerts: &mut Vec<Alert>,
    category: AlertCategory,
    tier: StatusTier,
    value: &Estimate<Decimal>,
    label: &str,
    action: &str,
) {
    let (Some(severity), Some(v)) = (Severity::from_tier(tier), value.as_option()) else {
        return;
    };
    alerts.push(Alert {
        category,
        severity,
        message: format!("{} at {}%", label, v.round_dp(2)),
        suggested_action: Some(action.to_string()),
    });
}

/// Danger before warning, then category order, duplicates dropped.
fn rank_actions(alerts: &[Alert]) -> Vec<RecommendedAction> {
    let mut candidates: Vec<&Alert> = alerts
        .iter()
        .filter(|a| a.suggested_action.is_some())
        .collect();
    candidates.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.category.cmp(&b.category))
    });

    let mut actions: Vec<RecommendedAction> = Vec::new();
    for alert in candidates {
        let Some(action) = &alert.suggested_action else {
            continue;
        };
        if actions.iter().any(|existing| &existing.action == action) {
            continue;
        }
        actions.push(RecommendedAction {
            rank: actions.len() as u32 + 1,
            category: alert.category,
            severity: alert.severity,
            action: action.clone(),
        });
    }
    actions
}
