// src/device/types.rs
//! Core types for virtual device description

use crate::config::constants::generator;
use crate::error::{SimError, SimResult};
use crate::utils::validation::{validate_finite, validate_fraction, validate_non_empty};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Well-known metric names used by the catalog and the triage bands
pub mod metrics {
    pub const HEART_RATE: &str = "heart_rate";
    pub const HEART_RATE_VARIABILITY: &str = "heart_rate_variability";
    pub const OXYGEN_SATURATION: &str = "oxygen_saturation";
    pub const TEMPERATURE: &str = "temperature";
    pub const BLOOD_PRESSURE_SYSTOLIC: &str = "blood_pressure_systolic";
    pub const BLOOD_PRESSURE_DIASTOLIC: &str = "blood_pressure_diastolic";
    pub const RESPIRATORY_RATE: &str = "respiratory_rate";
    pub const BLOOD_GLUCOSE: &str = "blood_glucose";
    pub const QRS_DURATION: &str = "qrs_duration";
    pub const QT_INTERVAL: &str = "qt_interval";
    pub const STEPS_PER_MINUTE: &str = "steps_per_minute";
}

/// Supported virtual device kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    VitalSignsMonitor,
    HeartRateMonitor,
    BloodPressureMonitor,
    PulseOximeter,
    Thermometer,
    GlucoseMeter,
    EcgMonitor,
    ActivityTracker,
}

impl DeviceType {
    /// Every supported kind, in catalog order
    pub const ALL: [DeviceType; 8] = [
        DeviceType::VitalSignsMonitor,
        DeviceType::HeartRateMonitor,
        DeviceType::BloodPressureMonitor,
        DeviceType::PulseOximeter,
        DeviceType::Thermometer,
        DeviceType::GlucoseMeter,
        DeviceType::EcgMonitor,
        DeviceType::ActivityTracker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::VitalSignsMonitor => "vital_signs_monitor",
            DeviceType::HeartRateMonitor => "heart_rate_monitor",
            DeviceType::BloodPressureMonitor => "blood_pressure_monitor",
            DeviceType::PulseOximeter => "pulse_oximeter",
            DeviceType::Thermometer => "thermometer",
            DeviceType::GlucoseMeter => "glucose_meter",
            DeviceType::EcgMonitor => "ecg_monitor",
            DeviceType::ActivityTracker => "activity_tracker",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        DeviceType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| SimError::invalid("device_type", format!("unsupported device type '{}'", s)))
    }
}

/// Generation parameters for one physiological metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub name: String,
    pub baseline: f64,
    /// Fractional standard deviation relative to the baseline
    pub variability: f64,
    pub unit: String,
    #[serde(default = "default_floor")]
    pub floor: f64,
    #[serde(default)]
    pub ceiling: Option<f64>,
}

fn default_floor() -> f64 {
    generator::DEFAULT_METRIC_FLOOR
}

impl MetricSpec {
    pub fn new(name: &str, baseline: f64, variability: f64, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            baseline,
            variability,
            unit: unit.to_string(),
            floor: generator::DEFAULT_METRIC_FLOOR,
            ceiling: None,
        }
    }

    pub fn with_ceiling(mut self, ceiling: f64) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    /// Same metric with a different centre and spread
    pub fn with_baseline(mut self, baseline: f64, variability: f64) -> Self {
        self.baseline = baseline;
        self.variability = variability;
        self
    }

    /// Absolute standard deviation implied by the variability
    pub fn std_dev(&self) -> f64 {
        self.baseline.abs() * self.variability
    }

    pub fn validate(&self) -> SimResult<()> {
        let field = |suffix: &str| format!("metric_specs.{}.{}", self.name, suffix);

        validate_non_empty("metric_specs.name", &self.name)?;
        validate_finite(&field("baseline"), self.baseline)?;
        validate_fraction(&field("variability"), self.variability)?;
        validate_finite(&field("floor"), self.floor)?;

        if let Some(ceiling) = self.ceiling {
            validate_finite(&field("ceiling"), ceiling)?;
            if ceiling < self.floor {
                return Err(SimError::invalid(field("ceiling"), "ceiling is below floor"));
            }
        }
        if self.baseline < self.floor {
            return Err(SimError::invalid(field("baseline"), "baseline is below floor"));
        }
        Ok(())
    }
}
