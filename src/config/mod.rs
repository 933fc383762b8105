// src/config/mod.rs
//! Simulator settings with validated defaults

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use crate::triage::thresholds::TriageThresholds;
use crate::utils::validation::{validate_fraction, validate_range, ValidationError};
use serde::{Deserialize, Serialize};

/// Complete simulator configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SimulatorSettings {
    #[serde(default)]
    pub registry: RegistrySettings,

    #[serde(default)]
    pub scenarios: ScenarioSettings,

    #[serde(default)]
    pub historical: HistoricalSettings,

    #[serde(default)]
    pub driver: DriverSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub triage: TriageThresholds,
}

/// Registry retention and randomness
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RegistrySettings {
    #[serde(default = "defaults::history_capacity")]
    pub history_capacity: usize,

    #[serde(default = "defaults::retired_session_capacity")]
    pub retired_session_capacity: usize,

    /// Fixed seed for reproducible runs; entropy-seeded when absent
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

/// Scenario preset knobs
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScenarioSettings {
    #[serde(default = "defaults::emergency_anomaly_probability")]
    pub emergency_anomaly_probability: f64,

    #[serde(default = "defaults::normal_anomaly_probability")]
    pub normal_anomaly_probability: f64,

    #[serde(default = "defaults::scenario_tick_interval_seconds")]
    pub tick_interval_seconds: u32,

    #[serde(default = "defaults::scenario_duration_seconds")]
    pub duration_seconds: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HistoricalSettings {
    #[serde(default = "defaults::historical_interval_minutes")]
    pub interval_minutes: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DriverSettings {
    #[serde(default = "defaults::poll_interval_ms")]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingSettings {
    #[serde(default = "defaults::log_filter")]
    pub filter: String,
}

impl SimulatorSettings {
    /// Check every bounded setting
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut check = |result: Result<(), ValidationError>| {
            if let Err(e) = result {
                errors.push(e);
            }
        };

        check(
            validate_range(
                "registry.history_capacity",
                self.registry.history_capacity,
                1,
                registry::MAX_HISTORY_CAPACITY,
            )
            .map(drop),
        );
        check(
            validate_range(
                "registry.retired_session_capacity",
                self.registry.retired_session_capacity,
                0,
                registry::MAX_HISTORY_CAPACITY,
            )
            .map(drop),
        );
        check(
            validate_fraction(
                "scenarios.emergency_anomaly_probability",
                self.scenarios.emergency_anomaly_probability,
            )
            .map(drop),
        );
        check(
            validate_range(
                "scenarios.normal_anomaly_probability",
                self.scenarios.normal_anomaly_probability,
                scenario::MIN_NORMAL_ANOMALY_PROBABILITY,
                scenario::MAX_NORMAL_ANOMALY_PROBABILITY,
            )
            .map(drop),
        );
        check(
            validate_range(
                "scenarios.tick_interval_seconds",
                self.scenarios.tick_interval_seconds,
                limits::MIN_TICK_INTERVAL_SECONDS,
                limits::MAX_TICK_INTERVAL_SECONDS,
            )
            .map(drop),
        );
        if let Some(duration) = self.scenarios.duration_seconds {
            check(
                validate_range(
                    "scenarios.duration_seconds",
                    duration,
                    limits::MIN_DURATION_SECONDS,
                    limits::MAX_DURATION_SECONDS,
                )
                .map(drop),
            );
        }
        check(
            validate_range(
                "historical.interval_minutes",
                self.historical.interval_minutes,
                limits::MIN_HISTORICAL_INTERVAL_MINUTES,
                limits::MAX_HISTORICAL_INTERVAL_MINUTES,
            )
            .map(drop),
        );
        check(
            validate_range(
                "driver.poll_interval_ms",
                self.driver.poll_interval_ms,
                driver::MIN_POLL_INTERVAL_MS,
                driver::MAX_POLL_INTERVAL_MS,
            )
            .map(drop),
        );

        errors.extend(self.triage.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            history_capacity: defaults::history_capacity(),
            retired_session_capacity: defaults::retired_session_capacity(),
            rng_seed: None,
        }
    }
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            emergency_anomaly_probability: defaults::emergency_anomaly_probability(),
            normal_anomaly_probability: defaults::normal_anomaly_probability(),
            tick_interval_seconds: defaults::scenario_tick_interval_seconds(),
            duration_seconds: defaults::scenario_duration_seconds(),
        }
    }
}

impl Default for HistoricalSettings {
    fn default() -> Self {
        Self {
            interval_minutes: defaults::historical_interval_minutes(),
        }
    }
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: defaults::poll_interval_ms(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: defaults::log_filter(),
        }
    }
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;

    pub fn history_capacity() -> usize { registry::DEFAULT_HISTORY_CAPACITY }
    pub fn retired_session_capacity() -> usize { registry::DEFAULT_RETIRED_SESSION_CAPACITY }

    pub fn emergency_anomaly_probability() -> f64 { scenario::DEFAULT_EMERGENCY_ANOMALY_PROBABILITY }
    pub fn normal_anomaly_probability() -> f64 { scenario::DEFAULT_NORMAL_ANOMALY_PROBABILITY }
    pub fn scenario_tick_interval_seconds() -> u32 { scenario::DEFAULT_TICK_INTERVAL_SECONDS }
    pub fn scenario_duration_seconds() -> Option<u64> { Some(scenario::DEFAULT_DURATION_SECONDS) }

    pub fn historical_interval_minutes() -> u32 { historical::DEFAULT_INTERVAL_MINUTES }
    pub fn poll_interval_ms() -> u64 { driver::DEFAULT_POLL_INTERVAL_MS }
    pub fn log_filter() -> String { logging::DEFAULT_FILTER.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = SimulatorSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.registry.history_capacity, 100);
        assert_eq!(settings.historical.interval_minutes, 15);
        assert_eq!(settings.scenarios.emergency_anomaly_probability, 0.8);
    }

    #[test]
    fn test_validation_collects_every_error() {
        let mut settings = SimulatorSettings::default();
        settings.registry.history_capacity = 0;
        settings.scenarios.normal_anomaly_probability = 0.5;
        settings.scenarios.tick_interval_seconds = 0;

        let errors = settings.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: SimulatorSettings = toml::from_str(
            r#"
            [registry]
            history_capacity = 10
            rng_seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(settings.registry.history_capacity, 10);
        assert_eq!(settings.registry.rng_seed, Some(7));
        assert_eq!(settings.registry.retired_session_capacity, 256);
        assert_eq!(settings.scenarios, ScenarioSettings::default());
    }
}
