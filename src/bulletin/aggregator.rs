//! Bulletin generation.
//!
//! [`BulletinAggregator::generate`] reads every daily report for a site and
//! period, classifies and prices each roster entry, prices equipment and
//! materials, and stores the result as a draft bulletin. Generation is
//! all-or-nothing: the first failing entry aborts it and nothing is stored.
//!
//! Generating twice from the same report revisions returns the stored
//! bulletin. Generating after a report changed produces a new bulletin that
//! supersedes the latest one for the same site and period.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{
    HolidayCalendar, classify_shift, price_equipment, price_material, value_hours,
};
use crate::config::{ConfigLoader, MissingProfilePolicy, PayRules, PriceList};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Bulletin, BulletinStatus, DailyReport, EmployeeLine, EmployeePayProfile, EquipmentLine,
    FinancialSummary, MaterialLine, MeasurementPeriod, SourceReportRef, dedupe_key,
};
use crate::store::{BulletinRepository, DailyReportSource, PayProfileRegistry};

/// Builds bulletins from daily reports.
#[derive(Clone)]
pub struct BulletinAggregator {
    reports: Arc<dyn DailyReportSource>,
    profiles: Arc<dyn PayProfileRegistry>,
    repository: Arc<dyn BulletinRepository>,
    calendar: Arc<dyn HolidayCalendar>,
    rules: PayRules,
    prices: PriceList,
}

impl BulletinAggregator {
    /// Creates an aggregator using the holiday calendar, pay rules and prices
    /// from `config`.
    pub fn new(
        reports: Arc<dyn DailyReportSource>,
        profiles: Arc<dyn PayProfileRegistry>,
        repository: Arc<dyn BulletinRepository>,
        config: &ConfigLoader,
    ) -> Self {
        Self {
            reports,
            profiles,
            repository,
            calendar: Arc::new(config.holiday_calendar()),
            rules: config.pay_rules().clone(),
            prices: config.prices().clone(),
        }
    }

    /// Replaces the holiday calendar.
    pub fn with_calendar(mut self, calendar: Arc<dyn HolidayCalendar>) -> Self {
        self.calendar = calendar;
        self
    }

    /// Generates, or returns the existing, bulletin for a site and period.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidPeriod`] if the period is reversed.
    /// - [`EngineError::NoSourceReports`] if no report matches.
    /// - [`EngineError::InvalidRange`], [`EngineError::MissingPayProfile`] or
    ///   [`EngineError::MissingUnitPrice`] from the first entry that fails.
    /// - [`EngineError::InconsistentSnapshot`] if a report changed while it
    ///   was being read.
    /// - [`EngineError::StorageError`] from the ports.
    pub fn generate(&self, site_id: &str, period: MeasurementPeriod) -> EngineResult<Bulletin> {
        period.validate()?;

        let reports = self.reports.reports_for(site_id, &period)?;
        if reports.is_empty() {
            warn!(
                site_id = %site_id,
                start_date = %period.start_date,
                end_date = %period.end_date,
                "No daily reports for bulletin period"
            );
            return Err(EngineError::NoSourceReports {
                site_id: site_id.to_string(),
                start_date: period.start_date,
                end_date: period.end_date,
            });
        }

        let mut source_reports: Vec<SourceReportRef> = reports
            .iter()
            .map(|r| SourceReportRef {
                report_id: r.id.clone(),
                revision: r.revision,
            })
            .collect();
        source_reports.sort();
        let key = dedupe_key(site_id, &period, &source_reports);

        if let Some(existing) = self.repository.find_by_dedupe_key(&key)? {
            info!(
                bulletin_id = %existing.id,
                dedupe_key = %key,
                "Bulletin already generated for this report set"
            );
            return Ok(existing);
        }

        let mut employee_lines = Vec::new();
        let mut equipment_lines = Vec::new();
        let mut material_lines = Vec::new();
        for report in &reports {
            employee_lines.extend(self.employee_lines(report)?);
            equipment_lines.extend(self.equipment_lines(report)?);
            material_lines.extend(self.material_lines(report)?);
        }

        self.verify_snapshot(&source_reports)?;

        let summary =
            FinancialSummary::from_lines(&employee_lines, &equipment_lines, &material_lines)?;
        let supersedes = self
            .repository
            .latest_for_period(site_id, &period)?
            .map(|b| b.id);

        let bulletin_id = Uuid::new_v4();
        let bulletin = Bulletin {
            id: bulletin_id,
            site_id: site_id.to_string(),
            period,
            source_reports,
            dedupe_key: key,
            employee_lines,
            equipment_lines,
            material_lines,
            summary,
            status: BulletinStatus::Draft,
            approval: None,
            invoice: None,
            supersedes,
            created_at: Utc::now(),
        };

        let stored = self.repository.create(bulletin)?;
        if stored.id != bulletin_id {
            info!(
                bulletin_id = %stored.id,
                dedupe_key = %stored.dedupe_key,
                "Bulletin already generated for this report set"
            );
            return Ok(stored);
        }
        info!(
            bulletin_id = %stored.id,
            site_id = %stored.site_id,
            reports = stored.source_reports.len(),
            grand_total = %stored.summary.grand_total,
            supersedes = ?stored.supersedes,
            "Generated bulletin"
        );
        Ok(stored)
    }

    fn employee_lines(&self, report: &DailyReport) -> EngineResult<Vec<EmployeeLine>> {
        report
            .roster
            .iter()
            .zip(report.shift_entries())
            .map(|(entry, shift)| {
                let profile = self.resolve_profile(&entry.employee_ref)?;
                let hours = classify_shift(
                    &profile,
                    &shift,
                    self.calendar.as_ref(),
                    &self.rules.night_window,
                )?;
                let value = value_hours(&hours, &profile, self.rules.holiday_multiplier)?;

                debug!(
                    report_id = %report.id,
                    employee_ref = %entry.employee_ref,
                    total_hours = %hours.total_hours,
                    total = %value.total,
                    "Priced roster entry"
                );

                Ok(EmployeeLine {
                    report_id: report.id.clone(),
                    work_date: report.date,
                    role: entry.role.clone(),
                    hours,
                    hourly_rate: profile.hourly_rate,
                    normal_value: value.normal_value,
                    tier1_value: value.tier1_value,
                    tier2_value: value.tier2_value,
                    night_value: value.night_value,
                    holiday_value: value.holiday_value,
                    total: value.total,
                })
            })
            .collect()
    }

    fn equipment_lines(&self, report: &DailyReport) -> EngineResult<Vec<EquipmentLine>> {
        report
            .equipment
            .iter()
            .map(|entry| price_equipment(&report.id, entry, &self.prices))
            .collect()
    }

    fn material_lines(&self, report: &DailyReport) -> EngineResult<Vec<MaterialLine>> {
        report
            .materials
            .iter()
            .map(|entry| price_material(&report.id, entry, &self.prices))
            .collect()
    }

    fn resolve_profile(&self, employee_ref: &str) -> EngineResult<EmployeePayProfile> {
        if let Some(profile) = self.profiles.profile_for(employee_ref)? {
            return Ok(profile);
        }

        match (&self.rules.missing_profile_policy, &self.rules.default_profile) {
            (MissingProfilePolicy::UseDefault, Some(default)) => {
                warn!(employee_ref = %employee_ref, "Using default pay profile");
                Ok(default.to_profile(employee_ref))
            }
            _ => Err(EngineError::MissingPayProfile {
                employee_ref: employee_ref.to_string(),
            }),
        }
    }

    /// Re-reads every source revision and fails if any moved on.
    fn verify_snapshot(&self, source_reports: &[SourceReportRef]) -> EngineResult<()> {
        for source in source_reports {
            let current = self.reports.revision_of(&source.report_id)?;
            if current != Some(source.revision) {
                warn!(
                    report_id = %source.report_id,
                    read = source.revision,
                    current = ?current,
                    "Daily report changed during bulletin generation"
                );
                return Err(EngineError::InconsistentSnapshot {
                    report_id: source.report_id.clone(),
                    read: source.revision,
                    current: current.map_or_else(|| "deleted".to_string(), |r| r.to_string()),
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for BulletinAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulletinAggregator")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::SundayCalendar;
    use crate::config::{DefaultPayProfile, EngineConfig};
    use crate::models::{EquipmentEntry, MaterialEntry, RosterEntry};
    use crate::store::{InMemoryBulletinRepository, InMemoryDailyReports, InMemoryPayProfiles};
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn roster(employee_ref: &str, start: u32, end: u32) -> RosterEntry {
        RosterEntry {
            employee_ref: employee_ref.to_string(),
            shift_start: time(start),
            shift_end: time(end),
            role: "welder".to_string(),
        }
    }

    fn report(id: &str, day: u32, roster: Vec<RosterEntry>) -> DailyReport {
        DailyReport {
            id: id.to_string(),
            revision: 1,
            site_id: "site-a".to_string(),
            date: date(day),
            roster,
            equipment: Vec::new(),
            materials: Vec::new(),
            technical_validation: Default::default(),
        }
    }

    fn engine_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config
            .prices
            .equipment
            .insert("Crane 50t".to_string(), dec("320.00"));
        config
            .prices
            .materials
            .insert("Electrode E7018".to_string(), dec("18.90"));
        config
    }

    struct Fixture {
        reports: InMemoryDailyReports,
        profiles: InMemoryPayProfiles,
        repository: InMemoryBulletinRepository,
        aggregator: BulletinAggregator,
    }

    fn fixture(config: EngineConfig) -> Fixture {
        let reports = InMemoryDailyReports::new();
        let profiles = InMemoryPayProfiles::with_profiles([
            EmployeePayProfile::with_rate("emp_001", dec("40")),
            EmployeePayProfile::with_rate("emp_002", dec("30")),
        ]);
        let repository = InMemoryBulletinRepository::new();
        let aggregator = BulletinAggregator::new(
            Arc::new(reports.clone()),
            Arc::new(profiles.clone()),
            Arc::new(repository.clone()),
            &ConfigLoader::from_config(config),
        )
        .with_calendar(Arc::new(SundayCalendar));
        Fixture {
            reports,
            profiles,
            repository,
            aggregator,
        }
    }

    fn tuesday_report() -> DailyReport {
        let mut r = report(
            "rdo-1",
            10,
            vec![roster("emp_001", 7, 19), roster("emp_002", 22, 6)],
        );
        r.equipment.push(EquipmentEntry {
            name: "Crane 50t".to_string(),
            category: "lifting".to_string(),
            hours_used: dec("6"),
            hourly_rate: None,
        });
        r.materials.push(MaterialEntry {
            name: "Electrode E7018".to_string(),
            category: "consumable".to_string(),
            quantity_used: dec("10"),
            unit: "kg".to_string(),
            unit_price: None,
        });
        r
    }

    fn march() -> MeasurementPeriod {
        MeasurementPeriod::new(date(1), date(31)).unwrap()
    }

    #[test]
    fn test_generate_prices_every_line() {
        let f = fixture(engine_config());
        f.reports.upsert(tuesday_report());

        let bulletin = f.aggregator.generate("site-a", march()).unwrap();

        assert_eq!(bulletin.status, BulletinStatus::Draft);
        assert_eq!(bulletin.employee_lines.len(), 2);
        // 8*40 + 2*40*1.6 + 2*40*2.0
        assert_eq!(bulletin.employee_lines[0].total, dec("608"));
        // 8*30 + 7*30*0.25
        assert_eq!(bulletin.employee_lines[1].total, dec("292.5"));
        assert_eq!(bulletin.employee_lines[1].hours.night_hours, dec("7"));
        assert_eq!(bulletin.summary.equipment_total, dec("1920"));
        assert_eq!(bulletin.summary.material_total, dec("189"));
        assert_eq!(bulletin.summary.grand_total, dec("3009.5"));
        assert_eq!(bulletin.summary.total_hours, dec("20"));
        assert!(bulletin.supersedes.is_none());
        assert!(f.repository.get(bulletin.id).unwrap().is_some());
    }

    #[test]
    fn test_holiday_report_uses_holiday_multiplier() {
        let f = fixture(engine_config());
        f.reports
            .upsert(report("rdo-7", 15, vec![roster("emp_001", 7, 16)]));

        let bulletin = f.aggregator.generate("site-a", march()).unwrap();
        let line = &bulletin.employee_lines[0];

        assert!(line.hours.is_holiday);
        assert_eq!(line.holiday_value, dec("720"));
        assert_eq!(bulletin.summary.holiday_hours, dec("9"));
    }

    #[test]
    fn test_grand_total_sums_line_totals() {
        let f = fixture(engine_config());
        f.reports.upsert(tuesday_report());
        f.reports
            .upsert(report("rdo-2", 11, vec![roster("emp_002", 6, 17)]));

        let b = f.aggregator.generate("site-a", march()).unwrap();
        let employee: Decimal = b.employee_lines.iter().map(|l| l.total).sum();
        let equipment: Decimal = b.equipment_lines.iter().map(|l| l.total).sum();
        let materials: Decimal = b.material_lines.iter().map(|l| l.total).sum();

        assert_eq!(b.summary.employee_total, employee);
        assert_eq!(b.summary.grand_total, employee + equipment + materials);
    }

    #[test]
    fn test_same_report_set_returns_same_bulletin() {
        let f = fixture(engine_config());
        f.reports.upsert(tuesday_report());

        let first = f.aggregator.generate("site-a", march()).unwrap();
        let second = f.aggregator.generate("site-a", march()).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(f.repository.len(), 1);
    }

    #[test]
    fn test_new_revision_supersedes_previous_bulletin() {
        let f = fixture(engine_config());
        f.reports.upsert(tuesday_report());
        let first = f.aggregator.generate("site-a", march()).unwrap();

        f.reports.upsert(tuesday_report());
        let second = f.aggregator.generate("site-a", march()).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.supersedes, Some(first.id));
        assert_eq!(second.source_reports[0].revision, 2);
        assert_eq!(f.repository.len(), 2);
    }

    #[test]
    fn test_missing_profile_fails_and_stores_nothing() {
        let f = fixture(engine_config());
        f.reports.upsert(report(
            "rdo-1",
            10,
            vec![roster("emp_001", 7, 15), roster("emp_404", 7, 15)],
        ));

        match f.aggregator.generate("site-a", march()) {
            Err(EngineError::MissingPayProfile { employee_ref }) => {
                assert_eq!(employee_ref, "emp_404");
            }
            other => panic!("Expected MissingPayProfile error, got {:?}", other),
        }
        assert!(f.repository.is_empty());
    }

    #[test]
    fn test_use_default_policy_prices_unknown_employee() {
        let mut config = engine_config();
        config.pay.missing_profile_policy = MissingProfilePolicy::UseDefault;
        config.pay.default_profile = Some(DefaultPayProfile {
            normal_shift_hours: dec("8"),
            tier1_multiplier: dec("1.6"),
            tier2_multiplier: dec("2.0"),
            night_multiplier: dec("0.25"),
            hourly_rate: dec("25.00"),
        });
        let f = fixture(config);
        f.reports
            .upsert(report("rdo-1", 10, vec![roster("emp_404", 7, 15)]));

        let bulletin = f.aggregator.generate("site-a", march()).unwrap();
        assert_eq!(bulletin.employee_lines[0].hourly_rate, dec("25.00"));
        assert_eq!(bulletin.employee_lines[0].total, dec("200.00"));
    }

    #[test]
    fn test_use_default_policy_without_default_profile_fails() {
        let mut config = engine_config();
        config.pay.missing_profile_policy = MissingProfilePolicy::UseDefault;
        let f = fixture(config);
        f.reports
            .upsert(report("rdo-1", 10, vec![roster("emp_404", 7, 15)]));

        assert!(matches!(
            f.aggregator.generate("site-a", march()),
            Err(EngineError::MissingPayProfile { .. })
        ));
    }

    #[test]
    fn test_registered_profile_wins_over_default() {
        let mut config = engine_config();
        config.pay.missing_profile_policy = MissingProfilePolicy::UseDefault;
        let f = fixture(config);
        f.profiles
            .register(EmployeePayProfile::with_rate("emp_003", dec("50")));
        f.reports
            .upsert(report("rdo-1", 10, vec![roster("emp_003", 7, 15)]));

        let bulletin = f.aggregator.generate("site-a", march()).unwrap();
        assert_eq!(bulletin.employee_lines[0].total, dec("400"));
    }

    #[test]
    fn test_unpriced_equipment_aborts_generation() {
        let f = fixture(EngineConfig::default());
        f.reports.upsert(tuesday_report());

        assert!(matches!(
            f.aggregator.generate("site-a", march()),
            Err(EngineError::MissingUnitPrice {
                kind: "equipment",
                ..
            })
        ));
        assert!(f.repository.is_empty());
    }

    #[test]
    fn test_no_reports_for_period() {
        let f = fixture(engine_config());
        f.reports.upsert(tuesday_report());

        let april = MeasurementPeriod::single_day(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        assert!(matches!(
            f.aggregator.generate("site-a", april),
            Err(EngineError::NoSourceReports { .. })
        ));
        assert!(matches!(
            f.aggregator.generate("site-b", march()),
            Err(EngineError::NoSourceReports { .. })
        ));
    }

    #[test]
    fn test_reversed_period_is_rejected() {
        let f = fixture(engine_config());
        let period = MeasurementPeriod {
            start_date: date(20),
            end_date: date(10),
        };
        assert!(matches!(
            f.aggregator.generate("site-a", period),
            Err(EngineError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_invalid_shift_aborts_generation() {
        let f = fixture(engine_config());
        f.reports
            .upsert(report("rdo-1", 10, vec![roster("emp_001", 8, 8)]));

        assert!(matches!(
            f.aggregator.generate("site-a", march()),
            Err(EngineError::InvalidRange { .. })
        ));
    }

    /// Serves reports whose revision has moved on by the time it is re-read.
    struct EditedDuringRead {
        inner: InMemoryDailyReports,
    }

    impl DailyReportSource for EditedDuringRead {
        fn reports_for(
            &self,
            site_id: &str,
            period: &MeasurementPeriod,
        ) -> EngineResult<Vec<DailyReport>> {
            self.inner.reports_for(site_id, period)
        }

        fn revision_of(&self, report_id: &str) -> EngineResult<Option<u32>> {
            Ok(self.inner.revision_of(report_id)?.map(|r| r + 1))
        }
    }

    #[test]
    fn test_report_edited_during_generation_is_inconsistent() {
        let inner = InMemoryDailyReports::new();
        inner.upsert(tuesday_report());
        let repository = InMemoryBulletinRepository::new();
        let aggregator = BulletinAggregator::new(
            Arc::new(EditedDuringRead { inner }),
            Arc::new(InMemoryPayProfiles::with_profiles([
                EmployeePayProfile::with_rate("emp_001", dec("40")),
                EmployeePayProfile::with_rate("emp_002", dec("30")),
            ])),
            Arc::new(repository.clone()),
            &ConfigLoader::from_config(engine_config()),
        );

        match aggregator.generate("site-a", march()) {
            Err(EngineError::InconsistentSnapshot {
                report_id,
                read,
                current,
            }) => {
                assert_eq!(report_id, "rdo-1");
                assert_eq!(read, 1);
                assert_eq!(current, "2");
            }
            other => panic!("Expected InconsistentSnapshot error, got {:?}", other),
        }
        assert!(repository.is_empty());
    }

    /// Misses every dedupe lookup, as if another generator stored the same
    /// report set between the lookup and the write.
    struct RacedDedupe {
        inner: InMemoryBulletinRepository,
    }

    impl BulletinRepository for RacedDedupe {
        fn create(&self, bulletin: Bulletin) -> EngineResult<Bulletin> {
            self.inner.create(bulletin)
        }

        fn get(&self, id: Uuid) -> EngineResult<Option<Bulletin>> {
            self.inner.get(id)
        }

        fn find_by_dedupe_key(&self, _dedupe_key: &str) -> EngineResult<Option<Bulletin>> {
            Ok(None)
        }

        fn latest_for_period(
            &self,
            site_id: &str,
            period: &MeasurementPeriod,
        ) -> EngineResult<Option<Bulletin>> {
            self.inner.latest_for_period(site_id, period)
        }

        fn list_for_site(&self, site_id: &str) -> EngineResult<Vec<Bulletin>> {
            self.inner.list_for_site(site_id)
        }

        fn transition(
            &self,
            id: Uuid,
            expected: BulletinStatus,
            target: BulletinStatus,
            stamp: &dyn Fn(&mut Bulletin),
        ) -> EngineResult<Bulletin> {
            self.inner.transition(id, expected, target, stamp)
        }
    }

    #[test]
    fn test_lost_dedupe_race_returns_stored_bulletin() {
        let reports = InMemoryDailyReports::new();
        reports.upsert(tuesday_report());
        let inner = InMemoryBulletinRepository::new();
        let aggregator = BulletinAggregator::new(
            Arc::new(reports),
            Arc::new(InMemoryPayProfiles::with_profiles([
                EmployeePayProfile::with_rate("emp_001", dec("40")),
                EmployeePayProfile::with_rate("emp_002", dec("30")),
            ])),
            Arc::new(RacedDedupe {
                inner: inner.clone(),
            }),
            &ConfigLoader::from_config(engine_config()),
        );

        let first = aggregator.generate("site-a", march()).unwrap();
        let second = aggregator.generate("site-a", march()).unwrap();

        assert_eq!(second, first);
        assert!(second.supersedes.is_none());
        assert_eq!(inner.len(), 1);
    }

    #[test]
    fn test_oversized_equipment_aborts_generation() {
        let f = fixture(engine_config());
        let mut r = tuesday_report();
        r.equipment[0].hours_used = Decimal::MAX;
        f.reports.upsert(r);

        assert!(matches!(
            f.aggregator.generate("site-a", march()),
            Err(EngineError::AmountOverflow { .. })
        ));
        assert!(f.repository.is_empty());
    }
}
