//! Pay profile registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::EngineResult;
use crate::models::EmployeePayProfile;

/// Lookup of employee pay profiles owned by the payroll collaborator.
pub trait PayProfileRegistry: Send + Sync {
    /// The profile for an employee, or `None` if the registry has none.
    fn profile_for(&self, employee_ref: &str) -> EngineResult<Option<EmployeePayProfile>>;
}

/// Keyed in-memory profile registry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPayProfiles {
    profiles: Arc<RwLock<HashMap<String, EmployeePayProfile>>>,
}

impl InMemoryPayProfiles {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the given profiles.
    pub fn with_profiles(profiles: impl IntoIterator<Item = EmployeePayProfile>) -> Self {
        let registry = Self::new();
        for profile in profiles {
            registry.register(profile);
        }
        registry
    }

    /// Adds or replaces an employee's profile.
    pub fn register(&self, profile: EmployeePayProfile) {
        self.profiles
            .write()
            .insert(profile.employee_ref.clone(), profile);
    }
}

impl PayProfileRegistry for InMemoryPayProfiles {
    fn profile_for(&self, employee_ref: &str) -> EngineResult<Option<EmployeePayProfile>> {
        Ok(self.profiles.read().get(employee_ref).cloned())
    }
}
