//! Error types for the bulletin engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while classifying hours,
//! generating bulletins, and moving them through the approval workflow.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

use crate::models::BulletinStatus;

/// The main error type for the bulletin engine.
///
/// # Example
///
/// ```
/// use bulletin_engine::error::EngineError;
///
/// let error = EngineError::MissingPayProfile {
///     employee_ref: "emp_042".to_string(),
/// };
/// assert_eq!(error.to_string(), "No pay profile configured for employee 'emp_042'");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A shift's start/end times do not describe a valid working range.
    #[error("Invalid shift range for '{employee_ref}' on {date}: {start}-{end} ({message})")]
    InvalidRange {
        /// The employee the shift belongs to.
        employee_ref: String,
        /// The work date of the shift.
        date: NaiveDate,
        /// The shift start time.
        start: NaiveTime,
        /// The shift end time.
        end: NaiveTime,
        /// A description of what made the range invalid.
        message: String,
    },

    /// No pay profile exists for the employee and the policy forbids a fallback.
    #[error("No pay profile configured for employee '{employee_ref}'")]
    MissingPayProfile {
        /// The employee reference that could not be resolved.
        employee_ref: String,
    },

    /// An equipment or material line has no unit price.
    #[error("No unit price configured for {kind} '{name}' (category '{category}')")]
    MissingUnitPrice {
        /// Either "equipment" or "material".
        kind: &'static str,
        /// The item name.
        name: String,
        /// The item category.
        category: String,
    },

    /// A monetary amount exceeds the decimal range.
    #[error("Amount overflow while computing {context}")]
    AmountOverflow {
        /// What was being computed.
        context: String,
    },

    /// A bulletin status change is not permitted by the workflow.
    #[error("Invalid bulletin status transition from {from} to {to}")]
    InvalidStateTransition {
        /// The status the bulletin is currently in.
        from: BulletinStatus,
        /// The status that was requested.
        to: BulletinStatus,
    },

    /// A projected figure cannot be computed from the supplied execution data.
    #[error("Indeterminate projection for '{field}': {reason}")]
    IndeterminateProjection {
        /// The report field that could not be computed.
        field: String,
        /// Why the figure is indeterminate.
        reason: String,
    },

    /// The requested bulletin does not exist.
    #[error("Bulletin {0} not found")]
    BulletinNotFound(Uuid),

    /// No daily reports matched the requested site and period.
    #[error("No daily reports found for site '{site_id}' between {start_date} and {end_date}")]
    NoSourceReports {
        /// The site that was queried.
        site_id: String,
        /// First day of the period.
        start_date: NaiveDate,
        /// Last day of the period.
        end_date: NaiveDate,
    },

    /// A measurement period is malformed.
    #[error("Invalid period {start_date} to {end_date}: end date is before start date")]
    InvalidPeriod {
        /// First day of the period.
        start_date: NaiveDate,
        /// Last day of the period.
        end_date: NaiveDate,
    },

    /// A source report changed while a bulletin was being generated from it.
    #[error("Daily report '{report_id}' changed during generation (read revision {read}, now {current})")]
    InconsistentSnapshot {
        /// The report that changed.
        report_id: String,
        /// The revision that was classified.
        read: u32,
        /// The revision now held by the source, if the report still exists.
        current: String,
    },

    /// The bulletin repository failed.
    #[error("Storage error: {message}")]
    StorageError {
        /// A description of the storage failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
