//! Labor-hour classification and measurement bulletin engine.
//!
//! This crate classifies site daily-report hours into pay buckets, prices
//! them into measurement bulletins, moves bulletins through an approval
//! workflow, and compares execution against budget.

#![warn(missing_docs)]

pub mod api;
pub mod bulletin;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
