//! Bulletin repository.
//!
//! The repository exclusively owns bulletin records. Every read returns an
//! owned copy, and status changes go through [`BulletinRepository::transition`],
//! which checks the expected status and applies the change as one step.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Bulletin, BulletinStatus, MeasurementPeriod};

/// Storage for generated bulletins.
pub trait BulletinRepository: Send + Sync {
    /// Stores a new bulletin.
    ///
    /// If a bulletin with the same dedupe key is already stored, nothing is
    /// written and the stored bulletin is returned instead.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StorageError`] if a different bulletin with the
    /// same id exists.
    fn create(&self, bulletin: Bulletin) -> EngineResult<Bulletin>;

    /// Fetches a bulletin by id.
    fn get(&self, id: Uuid) -> EngineResult<Option<Bulletin>>;

    /// Fetches the bulletin generated from exactly this input set.
    fn find_by_dedupe_key(&self, dedupe_key: &str) -> EngineResult<Option<Bulletin>>;

    /// The most recently created bulletin for a site and period.
    fn latest_for_period(
        &self,
        site_id: &str,
        period: &MeasurementPeriod,
    ) -> EngineResult<Option<Bulletin>>;

    /// All bulletins for a site in creation order.
    fn list_for_site(&self, site_id: &str) -> EngineResult<Vec<Bulletin>>;

    /// Moves a bulletin from `expected` to `target` and applies `stamp` to it.
    ///
    /// The status check and the write happen atomically, so of two callers
    /// racing on the same bulletin exactly one succeeds.
    ///
    /// # Errors
    ///
    /// - [`EngineError::BulletinNotFound`] if the id is unknown.
    /// - [`EngineError::InvalidStateTransition`] if the bulletin is not in
    ///   `expected`, or `expected` cannot move to `target`.
    fn transition(
        &self,
        id: Uuid,
        expected: BulletinStatus,
        target: BulletinStatus,
        stamp: &dyn Fn(&mut Bulletin),
    ) -> EngineResult<Bulletin>;
}

#[derive(Debug, Default)]
struct Records {
    bulletins: HashMap<Uuid, Bulletin>,
    by_dedupe_key: HashMap<String, Uuid>,
    creation_order: Vec<Uuid>,
}

/// In-memory repository behind a single `RwLock`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBulletinRepository {
    records: Arc<RwLock<Records>>,
}

impl InMemoryBulletinRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored bulletins.
    pub fn len(&self) -> usize {
        self.records.read().bulletins.len()
    }

    /// Returns true if no bulletins are stored.
    pub fn is_empty(&self) -> bool {
        self.records.read().bulletins.is_empty()
    }
}

impl BulletinRepository for InMemoryBulletinRepository {
    fn create(&self, bulletin: Bulletin) -> EngineResult<Bulletin> {
        let mut records = self.records.write();

        if let Some(existing) = records
            .by_dedupe_key
            .get(&bulletin.dedupe_key)
            .and_then(|id| records.bulletins.get(id))
        {
            return Ok(existing.clone());
        }
        if records.bulletins.contains_key(&bulletin.id) {
            return Err(EngineError::StorageError {
                message: format!("bulletin {} already exists", bulletin.id),
            });
        }

        records
            .by_dedupe_key
            .insert(bulletin.dedupe_key.clone(), bulletin.id);
        records.creation_order.push(bulletin.id);
        records.bulletins.insert(bulletin.id, bulletin.clone());
        Ok(bulletin)
    }

    fn get(&self, id: Uuid) -> EngineResult<Option<Bulletin>> {
        Ok(self.records.read().bulletins.get(&id).cloned())
    }

    fn find_by_dedupe_key(&self, dedupe_key: &str) -> EngineResult<Option<Bulletin>> {
        let records = self.records.read();
        Ok(records
            .by_dedupe_key
            .get(dedupe_key)
            .and_then(|id| records.bulletins.get(id))
            .cloned())
    }

    fn latest_for_period(
        &self,
        site_id: &str,
        period: &MeasurementPeriod,
    ) -> EngineResult<Option<Bulletin>> {
        let records = self.records.read();
        Ok(records
            .creation_order
            .iter()
            .rev()
            .filter_map(|id| records.bulletins.get(id))
            .find(|b| b.site_id == site_id && b.period == *period)
            .cloned())
    }

    fn list_for_site(&self, site_id: &str) -> EngineResult<Vec<Bulletin>> {
        let records = self.records.read();
        Ok(records
            .creation_order
            .iter()
            .filter_map(|id| records.bulletins.get(id))
            .filter(|b| b.site_id == site_id)
            .cloned()
            .collect())
    }

    fn transition(
        &self,
        id: Uuid,
        expected: BulletinStatus,
        target: BulletinStatus,
        stamp: &dyn Fn(&mut Bulletin),
    ) -> EngineResult<Bulletin> {
        let mut records = self.records.write();
        let bulletin = records
            .bulletins
            .get_mut(&id)
            .ok_or(EngineError::BulletinNotFound(id))?;

        if bulletin.status != expected || !expected.can_transition_to(target) {
            return Err(EngineError::InvalidStateTransition {
                from: bulletin.status,
                to: target,
            });
        }

        stamp(bulletin);
        bulletin.status = target;
        Ok(bulletin.clone())
    }
}
