//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::calculation::ConfiguredCalendar;
use crate::error::{EngineError, EngineResult};

use super::types::{
    EngineConfig, EngineFile, HolidayConfig, PayRules, PriceList, ThresholdsConfig,
    VarianceThresholds,
};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml      # Pay rules, night window, missing profile policy
/// ├── holidays.yaml    # Sunday rule and dated holidays
/// ├── prices.yaml      # Equipment and material unit prices
/// └── thresholds.yaml  # Variance tier thresholds
/// ```
///
/// # Example
///
/// ```no_run
/// use bulletin_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Holiday multiplier: {}", loader.pay_rules().holiday_multiplier);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any file is missing, contains invalid YAML, or
    /// holds values that fail validation (e.g. a night hour past 23 or a
    /// warning threshold beyond its danger threshold).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("engine.yaml");
        let engine = Self::load_yaml::<EngineFile>(&engine_path)?;
        Self::validate_pay_rules(&engine.pay, &engine_path)?;

        let holidays = Self::load_yaml::<HolidayConfig>(&path.join("holidays.yaml"))?;
        let prices = Self::load_yaml::<PriceList>(&path.join("prices.yaml"))?;

        let thresholds_path = path.join("thresholds.yaml");
        let thresholds = Self::load_yaml::<ThresholdsConfig>(&thresholds_path)?.variance;
        Self::validate_thresholds(&thresholds, &thresholds_path)?;

        Ok(Self {
            config: EngineConfig {
                pay: engine.pay,
                holidays,
                prices,
                thresholds,
            },
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_pay_rules(rules: &PayRules, path: &Path) -> EngineResult<()> {
        let window = rules.night_window;
        if window.start_hour > 23 || window.end_hour > 23 {
            return Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: format!(
                    "night window hours must be 0-23, got {}-{}",
                    window.start_hour, window.end_hour
                ),
            });
        }
        if rules.holiday_multiplier < Decimal::ZERO {
            return Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: "holiday_multiplier cannot be negative".to_string(),
            });
        }
        Ok(())
    }

    fn validate_thresholds(t: &VarianceThresholds, path: &Path) -> EngineResult<()> {
        let err = |message: &str| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: message.to_string(),
        };
        if t.cost_warning_pct > t.cost_danger_pct {
            return Err(err("cost_warning_pct must not exceed cost_danger_pct"));
        }
        if t.hours_warning_pct > t.hours_danger_pct {
            return Err(err("hours_warning_pct must not exceed hours_danger_pct"));
        }
        if t.efficiency_warning_pct < t.efficiency_danger_pct {
            return Err(err(
                "efficiency_warning_pct must not be below efficiency_danger_pct",
            ));
        }
        Ok(())
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the pay rules.
    pub fn pay_rules(&self) -> &PayRules {
        &self.config.pay
    }

    /// Returns the unit price list.
    pub fn prices(&self) -> &PriceList {
        &self.config.prices
    }

    /// Returns the variance thresholds.
    pub fn thresholds(&self) -> &VarianceThresholds {
        &self.config.thresholds
    }

    /// Builds the holiday calendar described by holidays.yaml.
    pub fn holiday_calendar(&self) -> ConfiguredCalendar {
        ConfiguredCalendar::from_config(&self.config.holidays)
    }
}
