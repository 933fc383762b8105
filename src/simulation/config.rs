//! Simulation configuration structures
//! Location: src/simulation/config.rs

use crate::config::constants::limits;
use crate::device::{default_metric_specs, DeviceType, MetricSpecs};
use crate::error::{SimError, SimResult};
use crate::utils::validation::{validate_fraction, validate_non_empty, validate_range};
use serde::{Deserialize, Serialize};

/// Parameters of one virtual device run; immutable once a session starts
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeviceSimulationConfig {
    pub device_type: DeviceType,
    /// Stable device identity; generated from the device type when absent
    #[serde(default)]
    pub device_id: Option<String>,
    pub patient_id: String,
    pub metric_specs: MetricSpecs,
    pub anomaly_probability: f64,
    pub tick_interval_seconds: u32,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    /// Scenario the config was resolved from, if any
    #[serde(default)]
    pub scenario: Option<String>,
}

impl DeviceSimulationConfig {
    /// Catalog defaults for `device_type`, no anomalies, unbounded duration
    pub fn new(device_type: DeviceType, patient_id: impl Into<String>, tick_interval_seconds: u32) -> Self {
        Self {
            device_type,
            device_id: None,
            patient_id: patient_id.into(),
            metric_specs: default_metric_specs(device_type),
            anomaly_probability: 0.0,
            tick_interval_seconds,
            duration_seconds: None,
            scenario: None,
        }
    }

    pub fn with_anomaly_probability(mut self, probability: f64) -> Self {
        self.anomaly_probability = probability;
        self
    }

    pub fn with_duration_seconds(mut self, seconds: u64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Reject out-of-range parameters before any session exists
    pub fn validate(&self) -> SimResult<()> {
        validate_non_empty("patient_id", &self.patient_id)?;
        if let Some(device_id) = &self.device_id {
            validate_non_empty("device_id", device_id)?;
        }
        validate_fraction("anomaly_probability", self.anomaly_probability)?;
        validate_range(
            "tick_interval_seconds",
            self.tick_interval_seconds,
            limits::MIN_TICK_INTERVAL_SECONDS,
            limits::MAX_TICK_INTERVAL_SECONDS,
        )?;
        if let Some(duration) = self.duration_seconds {
            validate_range(
                "duration_seconds",
                duration,
                limits::MIN_DURATION_SECONDS,
                limits::MAX_DURATION_SECONDS,
            )?;
        }

        if self.metric_specs.is_empty() {
            return Err(SimError::invalid("metric_specs", "at least one metric is required"));
        }
        for (name, spec) in &self.metric_specs {
            if name != &spec.name {
                return Err(SimError::invalid(
                    format!("metric_specs.{}", name),
                    format!("key does not match metric name '{}'", spec.name),
                ));
            }
            spec.validate()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::metrics;

    #[test]
    fn test_default_config_is_valid() {
        let config = DeviceSimulationConfig::new(DeviceType::PulseOximeter, "patient-1", 10);
        assert!(config.validate().is_ok());
        assert!(config.metric_specs.contains_key(metrics::OXYGEN_SATURATION));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let base = DeviceSimulationConfig::new(DeviceType::Thermometer, "patient-1", 10);

        let cases = vec![
            base.clone().with_anomaly_probability(1.2),
            base.clone().with_anomaly_probability(-0.1),
            DeviceSimulationConfig { tick_interval_seconds: 0, ..base.clone() },
            DeviceSimulationConfig { tick_interval_seconds: 3601, ..base.clone() },
            base.clone().with_duration_seconds(0),
            base.clone().with_duration_seconds(86_401),
            DeviceSimulationConfig { patient_id: " ".to_string(), ..base.clone() },
        ];

        for config in cases {
            match config.validate() {
                Err(SimError::InvalidConfiguration { .. }) => {}
                other => panic!("Expected InvalidConfiguration for {:?}, got {:?}", config, other),
            }
        }
    }

    #[test]
    fn test_mismatched_metric_key_rejected() {
        let mut config = DeviceSimulationConfig::new(DeviceType::Thermometer, "patient-1", 10);
        let spec = config.metric_specs.remove(metrics::TEMPERATURE).unwrap();
        config.metric_specs.insert("temp".to_string(), spec);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_metrics_rejected() {
        let mut config = DeviceSimulationConfig::new(DeviceType::Thermometer, "patient-1", 10);
        config.metric_specs.clear();
        assert!(config.validate().is_err());
    }
}
