//! Bulletin generation and approval.

mod aggregator;
mod approval;

pub use aggregator::BulletinAggregator;
pub use approval::BulletinWorkflow;
