//! Configuration loading and management for the bulletin engine.
//!
//! This module provides functionality to load engine configuration from YAML
//! files, including pay rules, the holiday calendar, unit prices, and variance
//! thresholds.
//!
//! # Example
//!
//! ```no_run
//! use bulletin_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Cost danger threshold: {}%", config.thresholds().cost_danger_pct);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_HOLIDAY_MULTIPLIER, DefaultPayProfile, EngineConfig, Holiday, HolidayConfig,
    MissingProfilePolicy, NightWindow, PayRules, PriceList, VarianceThresholds,
};
