//! Daily report source.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::EngineResult;
use crate::models::{DailyReport, MeasurementPeriod};

/// Read access to daily reports owned by the reporting collaborator.
pub trait DailyReportSource: Send + Sync {
    /// All reports for a site whose date falls inside the period, ordered by
    /// date and then report id.
    fn reports_for(
        &self,
        site_id: &str,
        period: &MeasurementPeriod,
    ) -> EngineResult<Vec<DailyReport>>;

    /// The current revision of a report, or `None` if it no longer exists.
    fn revision_of(&self, report_id: &str) -> EngineResult<Option<u32>>;
}

/// Keyed in-memory report store.
///
/// Replacing a report with [`upsert`](Self::upsert) bumps its revision, so a
/// bulletin generated from the old copy can be told apart from a new one.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDailyReports {
    reports: Arc<RwLock<HashMap<String, DailyReport>>>,
}

impl InMemoryDailyReports {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new report or replaces an existing one.
    ///
    /// A new report keeps the revision it was submitted with. A replacement
    /// gets the stored revision plus one. Returns the stored copy.
    pub fn upsert(&self, mut report: DailyReport) -> DailyReport {
        let mut reports = self.reports.write();
        if let Some(existing) = reports.get(&report.id) {
            report.revision = existing.revision + 1;
        } else if report.revision == 0 {
            report.revision = 1;
        }
        reports.insert(report.id.clone(), report.clone());
        report
    }

    /// Returns a copy of a report by id.
    pub fn get(&self, report_id: &str) -> Option<DailyReport> {
        self.reports.read().get(report_id).cloned()
    }

    /// Number of stored reports.
    pub fn len(&self) -> usize {
        self.reports.read().len()
    }

    /// Returns true if no reports are stored.
    pub fn is_empty(&self) -> bool {
        self.reports.read().is_empty()
    }
}

impl DailyReportSource for InMemoryDailyReports {
    fn reports_for(
        &self,
        site_id: &str,
        period: &MeasurementPeriod,
    ) -> EngineResult<Vec<DailyReport>> {
        let mut matching: Vec<DailyReport> = self
            .reports
            .read()
            .values()
            .filter(|r| r.site_id == site_id && period.contains_date(r.date))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(matching)
    }

    fn revision_of(&self, report_id: &str) -> EngineResult<Option<u32>> {
        Ok(self.reports.read().get(report_id).map(|r| r.revision))
    }
}
