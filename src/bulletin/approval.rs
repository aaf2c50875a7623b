//! Bulletin approval state machine.
//!
//! Draft → Approved → Invoiced, nothing else. Each transition is a single
//! compare-and-set on the repository, so a failed or losing transition leaves
//! the stored bulletin untouched.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Approval, Bulletin, BulletinStatus, InvoiceStamp};
use crate::store::BulletinRepository;

/// Moves bulletins through their lifecycle.
#[derive(Clone)]
pub struct BulletinWorkflow {
    repository: Arc<dyn BulletinRepository>,
}

impl BulletinWorkflow {
    /// Creates a workflow over a repository.
    pub fn new(repository: Arc<dyn BulletinRepository>) -> Self {
        Self { repository }
    }

    /// Fetches a bulletin.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BulletinNotFound`] if the id is unknown.
    pub fn get(&self, id: Uuid) -> EngineResult<Bulletin> {
        self.repository
            .get(id)?
            .ok_or(EngineError::BulletinNotFound(id))
    }

    /// Approves a draft bulletin and records who approved it.
    ///
    /// # Errors
    ///
    /// - [`EngineError::BulletinNotFound`] if the id is unknown.
    /// - [`EngineError::InvalidStateTransition`] if the bulletin is not a draft.
    pub fn approve(&self, id: Uuid, approver_id: &str) -> EngineResult<Bulletin> {
        let approval = Approval {
            approved_by: approver_id.to_string(),
            approved_at: Utc::now(),
        };
        let result = self.repository.transition(
            id,
            BulletinStatus::Draft,
            BulletinStatus::Approved,
            &|b: &mut Bulletin| b.approval = Some(approval.clone()),
        );
        log_transition(id, BulletinStatus::Approved, &result);
        result
    }

    /// Marks an approved bulletin as invoiced.
    ///
    /// # Errors
    ///
    /// - [`EngineError::BulletinNotFound`] if the id is unknown.
    /// - [`EngineError::InvalidStateTransition`] if the bulletin is not approved.
    pub fn invoice(&self, id: Uuid, invoice_ref: &str) -> EngineResult<Bulletin> {
        let stamp = InvoiceStamp {
            invoice_ref: invoice_ref.to_string(),
            invoiced_at: Utc::now(),
        };
        let result = self.repository.transition(
            id,
            BulletinStatus::Approved,
            BulletinStatus::Invoiced,
            &|b: &mut Bulletin| b.invoice = Some(stamp.clone()),
        );
        log_transition(id, BulletinStatus::Invoiced, &result);
        result
    }
}

fn log_transition(id: Uuid, target: BulletinStatus, result: &EngineResult<Bulletin>) {
    match result {
        Ok(_) => info!(bulletin_id = %id, status = %target, "Bulletin status changed"),
        Err(err) => warn!(
            bulletin_id = %id,
            target = %target,
            error = %err,
            "Bulletin transition rejected"
        ),
    }
}

impl std::fmt::Debug for BulletinWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulletinWorkflow").finish_non_exhaustive()
    }
}
