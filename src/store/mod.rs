//! Ports to the engine's external collaborators, with in-memory doubles.
//!
//! The aggregator and the approval workflow only see these traits. The
//! in-memory implementations are `Clone`; clones share the same storage.

mod bulletins;
mod profiles;
mod reports;

pub use bulletins::{BulletinRepository, InMemoryBulletinRepository};
pub use profiles::{InMemoryPayProfiles, PayProfileRegistry};
pub use reports::{DailyReportSource, InMemoryDailyReports};
