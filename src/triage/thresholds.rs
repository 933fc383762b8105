//! Clinical band thresholds used by alert triage
//! Location: src/triage/thresholds.rs
//!
//! Each metric has its own band shape because the clinical tables are not
//! symmetric: temperature has no low warning band, oxygen saturation only
//! has a floor, systolic pressure only has a ceiling.

use crate::config::constants::triage::*;
use crate::device::metrics;
use crate::utils::validation::{validate_finite, validate_range, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clinical band of a single metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Normal,
    Warning,
    Critical,
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Band::Normal => write!(f, "normal"),
            Band::Warning => write!(f, "warning"),
            Band::Critical => write!(f, "critical"),
        }
    }
}

/// Maps a metric value onto a band
pub trait BandClassifier {
    fn classify(&self, value: f64) -> Band;

    fn validate(&self, field: &str) -> Vec<ValidationError>;
}

/// Normal range flanked by warning bands on both sides.
/// Critical strictly below `critical_low` or above `critical_high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBands {
    pub critical_low: f64,
    pub normal_min: f64,
    pub normal_max: f64,
    pub critical_high: f64,
}

impl BandClassifier for RangeBands {
    fn classify(&self, value: f64) -> Band {
        if value < self.critical_low || value > self.critical_high {
            Band::Critical
        } else if value < self.normal_min || value > self.normal_max {
            Band::Warning
        } else {
            Band::Normal
        }
    }

    fn validate(&self, field: &str) -> Vec<ValidationError> {
        let mut errors = finite_errors(
            field,
            &[
                ("critical_low", self.critical_low),
                ("normal_min", self.normal_min),
                ("normal_max", self.normal_max),
                ("critical_high", self.critical_high),
            ],
        );
        if errors.is_empty() {
            push_err(&mut errors, ordered(field, "normal_min", self.normal_min, self.critical_low, self.normal_max));
            push_err(&mut errors, ordered(field, "critical_high", self.critical_high, self.normal_max, f64::MAX));
        }
        errors
    }
}

/// Temperature: normal range, a warning band above it, critical at or
/// above `critical_high` and anywhere below `normal_min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureBands {
    pub normal_min: f64,
    pub normal_max: f64,
    pub critical_high: f64,
}

impl BandClassifier for TemperatureBands {
    fn classify(&self, value: f64) -> Band {
        if value >= self.critical_high || value < self.normal_min {
            Band::Critical
        } else if value > self.normal_max {
            Band::Warning
        } else {
            Band::Normal
        }
    }

    fn validate(&self, field: &str) -> Vec<ValidationError> {
        let mut errors = finite_errors(
            field,
            &[
                ("normal_min", self.normal_min),
                ("normal_max", self.normal_max),
                ("critical_high", self.critical_high),
            ],
        );
        if errors.is_empty() {
            push_err(&mut errors, ordered(field, "normal_max", self.normal_max, self.normal_min, self.critical_high));
        }
        errors
    }
}

/// Only low values are abnormal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorBands {
    pub critical_low: f64,
    pub normal_min: f64,
}

impl BandClassifier for FloorBands {
    fn classify(&self, value: f64) -> Band {
        if value < self.critical_low {
            Band::Critical
        } else if value < self.normal_min {
            Band::Warning
        } else {
            Band::Normal
        }
    }

    fn validate(&self, field: &str) -> Vec<ValidationError> {
        let mut errors = finite_errors(
            field,
            &[("critical_low", self.critical_low), ("normal_min", self.normal_min)],
        );
        if errors.is_empty() {
            push_err(&mut errors, ordered(field, "normal_min", self.normal_min, self.critical_low, f64::MAX));
        }
        errors
    }
}

/// Only high values are abnormal; both edges are inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CeilingBands {
    pub warning_min: f64,
    pub critical_min: f64,
}

impl BandClassifier for CeilingBands {
    fn classify(&self, value: f64) -> Band {
        if value >= self.critical_min {
            Band::Critical
        } else if value >= self.warning_min {
            Band::Warning
        } else {
            Band::Normal
        }
    }

    fn validate(&self, field: &str) -> Vec<ValidationError> {
        let mut errors = finite_errors(
            field,
            &[("warning_min", self.warning_min), ("critical_min", self.critical_min)],
        );
        if errors.is_empty() {
            push_err(&mut errors, ordered(field, "critical_min", self.critical_min, self.warning_min, f64::MAX));
        }
        errors
    }
}

/// Complete set of triaged metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageThresholds {
    #[serde(default = "defaults::heart_rate")]
    pub heart_rate: RangeBands,

    #[serde(default = "defaults::oxygen_saturation")]
    pub oxygen_saturation: FloorBands,

    #[serde(default = "defaults::temperature")]
    pub temperature: TemperatureBands,

    #[serde(default = "defaults::blood_pressure_systolic")]
    pub blood_pressure_systolic: CeilingBands,

    #[serde(default = "defaults::respiratory_rate")]
    pub respiratory_rate: RangeBands,

    #[serde(default = "defaults::blood_glucose")]
    pub blood_glucose: RangeBands,
}

impl TriageThresholds {
    /// Every triaged metric with its classifier, in a fixed order
    pub fn rules(&self) -> [(&'static str, &dyn BandClassifier); 6] {
        [
            (metrics::HEART_RATE, &self.heart_rate),
            (metrics::OXYGEN_SATURATION, &self.oxygen_saturation),
            (metrics::TEMPERATURE, &self.temperature),
            (metrics::BLOOD_PRESSURE_SYSTOLIC, &self.blood_pressure_systolic),
            (metrics::RESPIRATORY_RATE, &self.respiratory_rate),
            (metrics::BLOOD_GLUCOSE, &self.blood_glucose),
        ]
    }

    /// Classify one metric; None when the metric is not triaged
    pub fn classify(&self, metric: &str, value: f64) -> Option<Band> {
        self.rules()
            .iter()
            .find(|(name, _)| *name == metric)
            .map(|(_, rule)| rule.classify(value))
    }

    pub fn is_triaged(&self, metric: &str) -> bool {
        self.rules().iter().any(|(name, _)| *name == metric)
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        self.rules()
            .iter()
            .flat_map(|(name, rule)| rule.validate(&format!("triage.{}", name)))
            .collect()
    }
}

impl Default for TriageThresholds {
    fn default() -> Self {
        Self {
            heart_rate: defaults::heart_rate(),
            oxygen_saturation: defaults::oxygen_saturation(),
            temperature: defaults::temperature(),
            blood_pressure_systolic: defaults::blood_pressure_systolic(),
            respiratory_rate: defaults::respiratory_rate(),
            blood_glucose: defaults::blood_glucose(),
        }
    }
}

fn finite_errors(field: &str, values: &[(&str, f64)]) -> Vec<ValidationError> {
    values
        .iter()
        .filter_map(|(name, value)| validate_finite(&format!("{}.{}", field, name), *value).err())
        .collect()
}

fn ordered(field: &str, name: &str, value: f64, min: f64, max: f64) -> Result<f64, ValidationError> {
    validate_range(&format!("{}.{}", field, name), value, min, max)
}

fn push_err<T>(errors: &mut Vec<ValidationError>, result: Result<T, ValidationError>) {
    if let Err(e) = result {
        errors.push(e);
    }
}

mod defaults {
    use super::*;

    pub fn heart_rate() -> RangeBands {
        RangeBands {
            critical_low: HEART_RATE_CRITICAL_LOW,
            normal_min: HEART_RATE_NORMAL_MIN,
            normal_max: HEART_RATE_NORMAL_MAX,
            critical_high: HEART_RATE_CRITICAL_HIGH,
        }
    }

    pub fn oxygen_saturation() -> FloorBands {
        FloorBands {
            critical_low: OXYGEN_SATURATION_CRITICAL_LOW,
            normal_min: OXYGEN_SATURATION_NORMAL_MIN,
        }
    }

    pub fn temperature() -> TemperatureBands {
        TemperatureBands {
            normal_min: TEMPERATURE_NORMAL_MIN,
            normal_max: TEMPERATURE_NORMAL_MAX,
            critical_high: TEMPERATURE_CRITICAL_HIGH,
        }
    }

    pub fn blood_pressure_systolic() -> CeilingBands {
        CeilingBands {
            warning_min: SYSTOLIC_WARNING_MIN,
            critical_min: SYSTOLIC_CRITICAL_MIN,
        }
    }

    pub fn respiratory_rate() -> RangeBands {
        RangeBands {
            critical_low: RESPIRATORY_RATE_CRITICAL_LOW,
            normal_min: RESPIRATORY_RATE_NORMAL_MIN,
            normal_max: RESPIRATORY_RATE_NORMAL_MAX,
            critical_high: RESPIRATORY_RATE_CRITICAL_HIGH,
        }
    }

    pub fn blood_glucose() -> RangeBands {
        RangeBands {
            critical_low: BLOOD_GLUCOSE_CRITICAL_LOW,
            normal_min: BLOOD_GLUCOSE_NORMAL_MIN,
            normal_max: BLOOD_GLUCOSE_NORMAL_MAX,
            critical_high: BLOOD_GLUCOSE_CRITICAL_HIGH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heart_rate_bands() {
        let t = TriageThresholds::default();
        assert_eq!(t.classify(metrics::HEART_RATE, 72.0), Some(Band::Normal));
        assert_eq!(t.classify(metrics::HEART_RATE, 100.0), Some(Band::Normal));
        assert_eq!(t.classify(metrics::HEART_RATE, 110.0), Some(Band::Warning));
        assert_eq!(t.classify(metrics::HEART_RATE, 120.0), Some(Band::Warning));
        assert_eq!(t.classify(metrics::HEART_RATE, 130.0), Some(Band::Critical));
        assert_eq!(t.classify(metrics::HEART_RATE, 55.0), Some(Band::Warning));
        assert_eq!(t.classify(metrics::HEART_RATE, 45.0), Some(Band::Critical));
    }

    #[test]
    fn test_asymmetric_bands() {
        let t = TriageThresholds::default();

        assert_eq!(t.classify(metrics::OXYGEN_SATURATION, 99.0), Some(Band::Normal));
        assert_eq!(t.classify(metrics::OXYGEN_SATURATION, 92.0), Some(Band::Warning));
        assert_eq!(t.classify(metrics::OXYGEN_SATURATION, 89.9), Some(Band::Critical));

        assert_eq!(t.classify(metrics::TEMPERATURE, 36.8), Some(Band::Normal));
        assert_eq!(t.classify(metrics::TEMPERATURE, 38.0), Some(Band::Warning));
        assert_eq!(t.classify(metrics::TEMPERATURE, 38.5), Some(Band::Critical));
        assert_eq!(t.classify(metrics::TEMPERATURE, 35.9), Some(Band::Critical));

        assert_eq!(t.classify(metrics::BLOOD_PRESSURE_SYSTOLIC, 115.0), Some(Band::Normal));
        assert_eq!(t.classify(metrics::BLOOD_PRESSURE_SYSTOLIC, 120.0), Some(Band::Warning));
        assert_eq!(t.classify(metrics::BLOOD_PRESSURE_SYSTOLIC, 140.0), Some(Band::Critical));
    }

    #[test]
    fn test_untriaged_metric() {
        let t = TriageThresholds::default();
        assert_eq!(t.classify(metrics::QT_INTERVAL, 900.0), None);
        assert!(!t.is_triaged(metrics::STEPS_PER_MINUTE));
        assert!(t.is_triaged(metrics::BLOOD_GLUCOSE));
    }

    #[test]
    fn test_default_thresholds_are_valid() {
        assert!(TriageThresholds::default().validate().is_empty());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut t = TriageThresholds::default();
        t.heart_rate.normal_min = 110.0;
        t.blood_pressure_systolic.critical_min = 100.0;
        t.temperature.critical_high = f64::NAN;

        let errors = t.validate();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_partial_toml_override() {
        let t: TriageThresholds = toml::from_str(
            r#"
            [heart_rate]
            critical_low = 40.0
            normal_min = 55.0
            normal_max = 105.0
            critical_high = 130.0
            "#,
        )
        .unwrap();

        assert_eq!(t.heart_rate.normal_max, 105.0);
        assert_eq!(t.oxygen_saturation, FloorBands { critical_low: 90.0, normal_min: 95.0 });
    }
}
