//! Application state for the bulletin engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::bulletin::{BulletinAggregator, BulletinWorkflow};
use crate::config::ConfigLoader;
use crate::store::{InMemoryBulletinRepository, InMemoryDailyReports, InMemoryPayProfiles};

/// Shared application state.
///
/// Holds the loaded configuration, the in-memory stores behind the engine's
/// ports, and the aggregator and workflow wired to them.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    reports: InMemoryDailyReports,
    profiles: InMemoryPayProfiles,
    aggregator: BulletinAggregator,
    workflow: BulletinWorkflow,
}

impl AppState {
    /// Creates the application state with empty in-memory stores.
    pub fn new(config: ConfigLoader) -> Self {
        let reports = InMemoryDailyReports::new();
        let profiles = InMemoryPayProfiles::new();
        let repository = Arc::new(InMemoryBulletinRepository::new());

        let aggregator = BulletinAggregator::new(
            Arc::new(reports.clone()),
            Arc::new(profiles.clone()),
            repository.clone(),
            &config,
        );
        let workflow = BulletinWorkflow::new(repository);

        Self {
            config: Arc::new(config),
            reports,
            profiles,
            aggregator,
            workflow,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// The daily report store.
    pub fn reports(&self) -> &InMemoryDailyReports {
        &self.reports
    }

    /// The pay profile registry.
    pub fn profiles(&self) -> &InMemoryPayProfiles {
        &self.profiles
    }

    /// The bulletin aggregator.
    pub fn aggregator(&self) -> &BulletinAggregator {
        &self.aggregator
    }

    /// The approval workflow.
    pub fn workflow(&self) -> &BulletinWorkflow {
        &self.workflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeePayProfile;
    use crate::store::PayProfileRegistry;
    use rust_decimal::Decimal;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_stores() {
        let state = AppState::new(ConfigLoader::default());
        let other = state.clone();
        other
            .profiles()
            .register(EmployeePayProfile::with_rate("emp_001", Decimal::from(30)));

        assert!(state.profiles().profile_for("emp_001").unwrap().is_some());
    }
}
