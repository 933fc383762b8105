// src/device/catalog.rs
//! Default metric sets for each supported device kind

use super::types::{metrics, DeviceType, MetricSpec};
use std::collections::BTreeMap;

/// Metric specs keyed by metric name
pub type MetricSpecs = BTreeMap<String, MetricSpec>;

/// Resting-adult defaults for a device kind
pub fn default_metric_specs(device_type: DeviceType) -> MetricSpecs {
    let specs = match device_type {
        DeviceType::VitalSignsMonitor => vec![
            heart_rate(),
            oxygen_saturation(),
            temperature(),
            systolic(),
            diastolic(),
            respiratory_rate(),
        ],
        DeviceType::HeartRateMonitor => vec![
            heart_rate(),
            MetricSpec::new(metrics::HEART_RATE_VARIABILITY, 45.0, 0.20, "ms"),
        ],
        DeviceType::BloodPressureMonitor => vec![systolic(), diastolic(), heart_rate()],
        DeviceType::PulseOximeter => vec![oxygen_saturation(), heart_rate(), respiratory_rate()],
        DeviceType::Thermometer => vec![temperature()],
        DeviceType::GlucoseMeter => vec![MetricSpec::new(metrics::BLOOD_GLUCOSE, 100.0, 0.08, "mg/dL")],
        DeviceType::EcgMonitor => vec![
            heart_rate(),
            MetricSpec::new(metrics::QRS_DURATION, 90.0, 0.08, "ms"),
            MetricSpec::new(metrics::QT_INTERVAL, 400.0, 0.04, "ms"),
        ],
        DeviceType::ActivityTracker => vec![
            MetricSpec::new(metrics::HEART_RATE, 75.0, 0.05, "bpm"),
            MetricSpec::new(metrics::STEPS_PER_MINUTE, 60.0, 0.50, "steps/min"),
        ],
    };

    specs.into_iter().map(|spec| (spec.name.clone(), spec)).collect()
}

fn heart_rate() -> MetricSpec {
    MetricSpec::new(metrics::HEART_RATE, 72.0, 0.05, "bpm")
}

fn oxygen_saturation() -> MetricSpec {
    MetricSpec::new(metrics::OXYGEN_SATURATION, 98.0, 0.008, "%").with_ceiling(100.0)
}

fn temperature() -> MetricSpec {
    MetricSpec::new(metrics::TEMPERATURE, 36.7, 0.004, "°C")
}

fn systolic() -> MetricSpec {
    MetricSpec::new(metrics::BLOOD_PRESSURE_SYSTOLIC, 112.0, 0.02, "mmHg")
}

fn diastolic() -> MetricSpec {
    MetricSpec::new(metrics::BLOOD_PRESSURE_DIASTOLIC, 74.0, 0.04, "mmHg")
}

fn respiratory_rate() -> MetricSpec {
    MetricSpec::new(metrics::RESPIRATORY_RATE, 16.0, 0.06, "breaths/min")
}
