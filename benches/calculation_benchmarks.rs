//! Performance benchmarks for the bulletin engine.
//!
//! Covers the hot paths of a measurement cycle:
//! - Classifying a single shift
//! - Generating a bulletin from a period of daily reports
//! - Computing a variance report
//! - Bulletin generation through the HTTP router
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use bulletin_engine::api::{AppState, create_router};
use bulletin_engine::bulletin::BulletinAggregator;
use bulletin_engine::calculation::{SundayCalendar, classify_shift, compute_variance};
use bulletin_engine::config::{ConfigLoader, NightWindow, VarianceThresholds};
use bulletin_engine::models::{
    Budget, DailyReport, EmployeePayProfile, EquipmentEntry, ExecutionSnapshot, MeasurementPeriod,
    RosterEntry, ShiftEntry, TechnicalValidation,
};
use bulletin_engine::store::{InMemoryBulletinRepository, InMemoryDailyReports, InMemoryPayProfiles};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

const EMPLOYEES_PER_REPORT: usize = 20;

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/default").expect("Failed to load config")
}

fn time(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// Builds one report per day with a mixed day and night roster.
fn create_reports(days: usize) -> Vec<DailyReport> {
    (0..days)
        .map(|day| {
            let roster = (0..EMPLOYEES_PER_REPORT)
                .map(|i| {
                    let (start, end) = if i % 4 == 0 { (22, 6) } else { (7, 19) };
                    RosterEntry {
                        employee_ref: format!("emp_{:03}", i),
                        shift_start: time(start),
                        shift_end: time(end),
                        role: "welder".to_string(),
                    }
                })
                .collect();
            DailyReport {
                id: format!("rdo-{:03}", day),
                revision: 1,
                site_id: "site-bench".to_string(),
                date: start_date() + Duration::days(day as i64),
                roster,
                equipment: vec![EquipmentEntry {
                    name: "Crane 50t".to_string(),
                    category: "lifting".to_string(),
                    hours_used: Decimal::from(6),
                    hourly_rate: None,
                }],
                materials: Vec::new(),
                technical_validation: TechnicalValidation::default(),
            }
        })
        .collect()
}

fn create_aggregator(config: &ConfigLoader, reports: &[DailyReport]) -> BulletinAggregator {
    let store = InMemoryDailyReports::new();
    for report in reports {
        store.upsert(report.clone());
    }
    let profiles = InMemoryPayProfiles::with_profiles(
        (0..EMPLOYEES_PER_REPORT)
            .map(|i| EmployeePayProfile::with_rate(format!("emp_{:03}", i), Decimal::from(40))),
    );
    BulletinAggregator::new(
        Arc::new(store),
        Arc::new(profiles),
        Arc::new(InMemoryBulletinRepository::new()),
        config,
    )
}

/// Benchmark: Classifying a single overnight shift.
fn bench_classify_shift(c: &mut Criterion) {
    let profile = EmployeePayProfile::with_rate("emp_001", Decimal::from(40));
    let shift = ShiftEntry {
        employee_ref: "emp_001".to_string(),
        work_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        start: time(18),
        end: time(6),
    };
    let window = NightWindow::default();

    c.bench_function("classify_shift", |b| {
        b.iter(|| {
            black_box(classify_shift(
                black_box(&profile),
                black_box(&shift),
                &SundayCalendar,
                &window,
            ))
        })
    });
}

/// Benchmark: Generating bulletins for growing measurement periods.
///
/// Each iteration gets a fresh repository so the dedupe lookup never
/// short-circuits generation.
fn bench_generate_bulletin(c: &mut Criterion) {
    let config = load_config();
    let mut group = c.benchmark_group("generate_bulletin");

    for days in [1usize, 7, 30].iter() {
        let reports = create_reports(*days);
        let period = MeasurementPeriod::new(
            start_date(),
            start_date() + Duration::days(*days as i64 - 1),
        )
        .unwrap();

        group.throughput(Throughput::Elements((*days * EMPLOYEES_PER_REPORT) as u64));
        group.bench_with_input(BenchmarkId::new("days", days), days, |b, _| {
            b.iter_batched(
                || create_aggregator(&config, &reports),
                |aggregator| black_box(aggregator.generate("site-bench", period)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Benchmark: Variance report with alerts in every category.
fn bench_compute_variance(c: &mut Criterion) {
    let budget = Budget {
        site_id: "site-bench".to_string(),
        planned_hours_total: Decimal::from(10_000),
        avg_hourly_cost: Decimal::from(50),
        planned_value_total: Decimal::from(500_000),
        planned_completion: NaiveDate::from_ymd_opt(2026, 5, 1),
    };
    let snapshot = ExecutionSnapshot {
        hours_executed: Decimal::from(1300),
        hours_planned_to_date: Decimal::from(1000),
        realized_hourly_cost: Decimal::from(62),
        cost_to_date: Decimal::from(80_600),
        percent_complete: Decimal::from(12),
        elapsed_days: 15,
        as_of: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
        technical_validation: TechnicalValidation {
            certified: false,
            calibrated: false,
        },
    };
    let thresholds = VarianceThresholds::default();

    c.bench_function("compute_variance", |b| {
        b.iter(|| {
            black_box(compute_variance(
                black_box(&snapshot),
                black_box(&budget),
                &thresholds,
            ))
        })
    });
}

/// Benchmark: POST /bulletins end to end.
fn bench_generate_via_router(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = load_config();
    let reports = create_reports(7);
    let body = serde_json::json!({
        "site_id": "site-bench",
        "period": { "start_date": "2026-03-02", "end_date": "2026-03-08" }
    })
    .to_string();

    c.bench_function("generate_via_router", |b| {
        b.to_async(&rt).iter_batched(
            || {
                let state = AppState::new(config.clone());
                for report in &reports {
                    state.reports().upsert(report.clone());
                }
                for i in 0..EMPLOYEES_PER_REPORT {
                    state.profiles().register(EmployeePayProfile::with_rate(
                        format!("emp_{:03}", i),
                        Decimal::from(40),
                    ));
                }
                create_router(state)
            },
            |router| {
                let body = body.clone();
                async move {
                    let response = router
                        .oneshot(
                            Request::builder()
                                .method("POST")
                                .uri("/bulletins")
                                .header("Content-Type", "application/json")
                                .body(Body::from(body))
                                .unwrap(),
                        )
                        .await
                        .unwrap();
                    black_box(response)
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_classify_shift,
    bench_generate_bulletin,
    bench_compute_variance,
    bench_generate_via_router,
);
criterion_main!(benches);
