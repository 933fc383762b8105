//! Boundary request accepted from outside the crate
//! Location: src/simulation/request.rs
//!
//! Durations arrive in minutes here and are converted to the seconds used by
//! sessions once validated.

use super::config::DeviceSimulationConfig;
use crate::config::constants::limits;
use crate::device::DeviceType;
use crate::error::SimResult;
use crate::utils::validation::{validate_fraction, validate_non_empty, validate_range};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationRequest {
    pub device_type: DeviceType,
    pub patient_id: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    pub tick_interval_seconds: u32,
    #[serde(default)]
    pub anomaly_probability: Option<f64>,
}

impl SimulationRequest {
    pub fn new(device_type: DeviceType, patient_id: impl Into<String>, tick_interval_seconds: u32) -> Self {
        Self {
            device_type,
            patient_id: patient_id.into(),
            duration_minutes: None,
            tick_interval_seconds,
            anomaly_probability: None,
        }
    }

    pub fn with_duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_anomaly_probability(mut self, probability: f64) -> Self {
        self.anomaly_probability = Some(probability);
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        validate_non_empty("patient_id", &self.patient_id)?;
        if let Some(minutes) = self.duration_minutes {
            validate_range(
                "duration_minutes",
                minutes,
                limits::MIN_DURATION_MINUTES,
                limits::MAX_DURATION_MINUTES,
            )?;
        }
        validate_range(
            "tick_interval_seconds",
            self.tick_interval_seconds,
            limits::MIN_TICK_INTERVAL_SECONDS,
            limits::MAX_TICK_INTERVAL_SECONDS,
        )?;
        if let Some(probability) = self.anomaly_probability {
            validate_fraction("anomaly_probability", probability)?;
        }
        Ok(())
    }

    /// Validated session config built from the device catalog
    pub fn into_config(self) -> SimResult<DeviceSimulationConfig> {
        self.validate()?;

        let mut config = DeviceSimulationConfig::new(
            self.device_type,
            self.patient_id,
            self.tick_interval_seconds,
        )
        .with_anomaly_probability(self.anomaly_probability.unwrap_or(0.0));
        config.duration_seconds = self.duration_minutes.map(|m| u64::from(m) * 60);

        config.validate()?;
        Ok(config)
    }
}
